//! Error type for ledger store operations

use thiserror::Error;

/// Errors returned by the owner store and session handling
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("owner '{0}' not found")]
    OwnerNotFound(String),

    #[error("owner '{0}' already exists")]
    OwnerExists(String),

    #[error("member '{0}' not found")]
    MemberNotFound(String),

    #[error("member with name '{0}' already exists")]
    MemberExists(String),

    #[error("payment '{0}' not found")]
    PaymentNotFound(String),

    #[error("expense '{0}' not found")]
    ExpenseNotFound(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
