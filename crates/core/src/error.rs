//! Domain error model.

use thiserror::Error;

/// Result type used across the analytics crates.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The analytical functions themselves are total: short or empty inputs yield
/// neutral results. Errors only surface at the boundary, when a caller hands
/// in a configuration or payload that breaks a contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. negative quantity, non-finite knob).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. empty string).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
