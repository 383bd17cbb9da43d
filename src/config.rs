//! Lint Configuration
//!
//! Optional TOML file; every field falls back to a default.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Msgpack,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LintConfig {
    /// Directory holding `recipes/` and `tags/`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Report overlapping recipes as warnings
    #[serde(default = "default_true")]
    pub report_conflicts: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            report_conflicts: true,
            output: OutputFormat::Json,
        }
    }
}

impl LintConfig {
    /// Read the config file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))
    }
}
