//! Order lifecycle: the root actor that owns `pesanan.csv` and coordinates stock
//! changes and transaction records through the product and ledger actors.
//!
//! ```text
//!            create             mark done
//!   (new) ──────────► Pending ─────────────► Selesai
//!                        │
//!                        │ cancel
//!                        ▼
//!                    Dibatalkan
//! ```

mod error;
mod messages;
mod service;

pub use error::*;
pub use messages::*;
pub use service::*;
