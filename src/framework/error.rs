use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by a [`ResourceActor`](super::ResourceActor), generic over the
/// entity's own error type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Entity(E),
}

impl<E> From<StoreError> for FrameworkError<E> {
    fn from(e: StoreError) -> Self {
        FrameworkError::Storage(e.to_string())
    }
}
