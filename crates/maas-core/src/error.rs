//! Domain-level error types.

use thiserror::Error;

use crate::ports::LedgerError;

/// Domain errors - failures of the account operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Missing client identity")]
    Unauthorized,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] LedgerError),
}
