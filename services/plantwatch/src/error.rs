//! Error types for the plantwatch service

/// Errors that can occur in the plantwatch service
#[derive(Debug, thiserror::Error)]
pub enum PlantwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sensor error: {0}")]
    Sensor(String),
}

/// Result type alias for plantwatch operations
pub type Result<T> = std::result::Result<T, PlantwatchError>;
