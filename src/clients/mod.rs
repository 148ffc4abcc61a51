//! Typed handles for every actor in the system.

#[macro_use]
mod macros;

mod ledger_client;
mod notifier_client;
mod order_client;
mod product_client;

pub use ledger_client::*;
pub use notifier_client::*;
pub use order_client::*;
pub use product_client::*;
