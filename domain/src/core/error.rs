//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Credential pool is empty")]
    EmptyCredentialPool,

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
