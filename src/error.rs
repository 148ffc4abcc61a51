use thiserror::Error;

use crate::ledger_actor::LedgerError;
use crate::notifier::NotifierError;
use crate::order_service::OrderError;
use crate::product_actor::ProductError;
use crate::store::StoreError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Top-level error of the retail system and the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Notifier(#[from] NotifierError),
    #[error("Shutdown error: {0}")]
    Shutdown(String),
}
