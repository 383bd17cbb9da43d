//! Recipe Linting
//!
//! Loads a data directory the way the crafting registry does at startup and
//! turns every problem found into a diagnostic for tooling.

use tracing::{error, info, warn};

use crate::config::LintConfig;
use crate::crafting::CraftingRegistry;
use crate::protocol::{LintResponse, SingleError};

/// Load tags and recipes from the configured data directory and report problems
pub fn lint(config: &LintConfig) -> LintResponse {
    let data_dir = config.data_dir.display().to_string();
    let mut registry = CraftingRegistry::new();
    let mut errors = Vec::new();

    match registry.load_tags_from_directory(&config.data_dir) {
        Ok(diagnostics) => errors.extend(diagnostics),
        Err(e) => {
            error!("Failed to load tags: {}", e);
            errors.push(SingleError::error(&data_dir, 0, 0, &e));
        }
    }

    match registry.load_from_directory(&config.data_dir) {
        Ok(diagnostics) => errors.extend(diagnostics),
        Err(e) => {
            error!("Failed to load recipes: {}", e);
            errors.push(SingleError::error(&data_dir, 0, 0, &e));
        }
    }

    if config.report_conflicts {
        for (a, b) in registry.conflicts() {
            warn!("Recipes '{}' and '{}' overlap", a, b);
            errors.push(SingleError::warning(
                &data_dir,
                0,
                0,
                &format!("recipes '{}' and '{}' accept the same inputs", a, b),
            ));
        }
    }

    let response = LintResponse::new(errors);
    info!(
        "Linted {} recipes: {} diagnostics, load successful: {}",
        registry.len(),
        response.errors.len(),
        response.load_successful
    );
    response
}
