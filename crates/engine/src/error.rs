use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use depotiq_core::DomainError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Domain(DomainError::Validation(_)) => "validation_error",
            EngineError::Domain(DomainError::InvariantViolation(_)) => "invariant_violation",
            EngineError::Domain(DomainError::InvalidId(_)) => "invalid_id",
            EngineError::Payload(_) => "invalid_payload",
            EngineError::Config(_) => "invalid_config",
        }
    }

    /// `{"error": <code>, "message": <text>}`
    pub fn to_json(&self) -> JsonValue {
        json!({
            "error": self.code(),
            "message": self.to_string(),
        })
    }
}
