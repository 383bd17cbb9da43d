use serde::{Deserialize, Serialize};

/// Discriminator carried by lint responses
pub const LINT_RESPONSE: &str = "LintResponse";

// ============================================================================
// Tooling -> IDE Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SocketMessage {
    #[serde(rename = "LintResponse")]
    LintResponse(LintResponse),
}

/// Result of linting a set of recipe files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintResponse {
    pub errors: Vec<SingleError>,
    #[serde(rename = "loadSuccessful")]
    pub load_successful: bool,
}

impl LintResponse {
    /// Loading counts as successful unless an error-level diagnostic is present
    pub fn new(errors: Vec<SingleError>) -> Self {
        let load_successful = !errors.iter().any(|e| e.level == ErrorLevel::Error);
        Self {
            errors,
            load_successful,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorLevel {
    Info,
    Warn,
    Error,
}

/// One diagnostic, positioned by file, line and column offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleError {
    pub file_name: String,
    pub line: u32,
    pub offset: u32,
    pub explanation: String,
    pub level: ErrorLevel,
}

impl SingleError {
    pub fn new(file_name: &str, line: u32, offset: u32, explanation: &str, level: ErrorLevel) -> Self {
        Self {
            file_name: file_name.to_string(),
            line,
            offset,
            explanation: explanation.to_string(),
            level,
        }
    }

    pub fn error(file_name: &str, line: u32, offset: u32, explanation: &str) -> Self {
        Self::new(file_name, line, offset, explanation, ErrorLevel::Error)
    }

    pub fn warning(file_name: &str, line: u32, offset: u32, explanation: &str) -> Self {
        Self::new(file_name, line, offset, explanation, ErrorLevel::Warn)
    }
}

// ============================================================================
// Encoding
// ============================================================================

pub fn encode_json(message: &SocketMessage) -> Result<String, String> {
    serde_json::to_string(message).map_err(|e| format!("Failed to encode message: {}", e))
}

pub fn decode_json(data: &str) -> Result<SocketMessage, String> {
    serde_json::from_str(data).map_err(|e| format!("Failed to decode message: {}", e))
}

/// Encode as a MessagePack map with named fields
pub fn encode_msgpack(message: &SocketMessage) -> Result<Vec<u8>, String> {
    rmp_serde::to_vec_named(message).map_err(|e| format!("Failed to encode message: {}", e))
}

pub fn decode_msgpack(data: &[u8]) -> Result<SocketMessage, String> {
    rmp_serde::from_slice(data).map_err(|e| format!("Failed to decode MessagePack: {}", e))
}
