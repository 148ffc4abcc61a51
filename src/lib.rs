//! Retail store core: products, orders, transactions, stock notifications and sales
//! reports over flat CSV files.
//!
//! Every entity-set file is owned by one actor, which is its only writer:
//!
//! ```text
//! caller ──► OrderClient ──► OrderService ──┬──► ProductClient ──► ResourceActor<Product>     ──► produk.csv
//!                              │            └──► LedgerClient  ──► ResourceActor<Transaction> ──► transaksi.csv
//!                              └──► pesanan.csv
//! ResourceActor<Product> ── EntityEvent ──► StockNotifier
//! Reporter ──► (reads all three files)
//! ```
//!
//! Start everything with [`RetailSystem::start`](app_system::RetailSystem::start).

pub mod app_system;
pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod ledger_actor;
pub mod model;
pub mod notifier;
pub mod order_service;
pub mod product_actor;
pub mod reports;
pub mod store;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, RetailSystem};
pub use config::AppConfig;
pub use error::AppError;
