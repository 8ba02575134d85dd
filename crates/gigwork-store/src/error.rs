//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Transaction conflict: {0}")]
    TxnConflict(String),
}

impl StoreError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    pub fn txn_conflict(msg: impl Into<String>) -> Self {
        Self::TxnConflict(msg.into())
    }

    /// True if the error was caused by a concurrent conflicting commit.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::TxnConflict(_))
    }
}
