use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeaseEngineError {
    fn from(e: serde_json::Error) -> Self {
        LeaseEngineError::SerializationError(e.to_string())
    }
}
