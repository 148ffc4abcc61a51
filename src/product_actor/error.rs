use thiserror::Error;

use crate::framework::FrameworkError;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product already exists: {0}")]
    AlreadyExists(String),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Product persistence error: {0}")]
    PersistenceError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<ProductError>> for ProductError {
    fn from(e: FrameworkError<ProductError>) -> Self {
        match e {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::AlreadyExists(id) => ProductError::AlreadyExists(id),
            FrameworkError::Storage(msg) => ProductError::PersistenceError(msg),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                ProductError::ActorCommunicationError(e.to_string())
            }
        }
    }
}
