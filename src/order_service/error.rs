use thiserror::Error;

use crate::ledger_actor::LedgerError;
use crate::model::OrderStatus;
use crate::product_actor::ProductError;
use crate::store::StoreError;

/// Errors returned by the order service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Order {id} cannot become {to}: it is already {}", .from.describe())]
    InvalidStateTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Order already exists: {0}")]
    AlreadyExists(String),
    #[error("Order persistence error: {0}")]
    PersistenceError(String),
    #[error("Stock update failed: {0}")]
    StockUpdateFailed(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<ProductError> for OrderError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(id) => OrderError::InvalidProduct(id),
            ProductError::InsufficientStock { requested, available } => {
                OrderError::InsufficientStock { requested, available }
            }
            ProductError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
            other => OrderError::StockUpdateFailed(other.to_string()),
        }
    }
}

impl From<LedgerError> for OrderError {
    fn from(e: LedgerError) -> Self {
        OrderError::TransactionFailed(e.to_string())
    }
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        OrderError::PersistenceError(e.to_string())
    }
}
