//! Errors shared by the backing-service ports.

use thiserror::Error;

/// Failure of a calendar, spreadsheet or notification adapter.
///
/// Tool handlers flatten these into result text; they never reach the
/// orchestrator as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}
