use thiserror::Error;

use crate::framework::FrameworkError;

/// Errors that can occur while recording or reading transactions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Transaction already exists: {0}")]
    AlreadyExists(String),
    #[error("Transaction validation error: {0}")]
    ValidationError(String),
    #[error("Transaction {0} is immutable")]
    Immutable(String),
    #[error("Ledger persistence error: {0}")]
    PersistenceError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<LedgerError>> for LedgerError {
    fn from(e: FrameworkError<LedgerError>) -> Self {
        match e {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => LedgerError::NotFound(id),
            FrameworkError::AlreadyExists(id) => LedgerError::AlreadyExists(id),
            FrameworkError::Storage(msg) => LedgerError::PersistenceError(msg),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                LedgerError::ActorCommunicationError(e.to_string())
            }
        }
    }
}
