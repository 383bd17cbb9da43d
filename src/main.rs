use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crafting_ingredients::config::{LintConfig, OutputFormat};
use crafting_ingredients::lint::lint;
use crafting_ingredients::protocol::{self, SocketMessage};
use tracing::error;

fn main() -> ExitCode {
    // Diagnostics go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crafting_ingredients=info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match LintConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let response = lint(&config);
    let load_successful = response.load_successful;
    let message = SocketMessage::LintResponse(response);

    let encoded = match config.output {
        OutputFormat::Json => protocol::encode_json(&message).map(|mut json| {
            json.push('\n');
            json.into_bytes()
        }),
        OutputFormat::Msgpack => protocol::encode_msgpack(&message),
    };

    let written = encoded.and_then(|bytes| {
        std::io::stdout()
            .write_all(&bytes)
            .map_err(|e| format!("Failed to write response: {}", e))
    });
    if let Err(e) = written {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    if load_successful {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
