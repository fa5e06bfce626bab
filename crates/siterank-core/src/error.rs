use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteRankError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Malformed flow network: {0}")]
    MalformedNetwork(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SiteRankError {
    fn from(e: serde_json::Error) -> Self {
        SiteRankError::SerializationError(e.to_string())
    }
}
