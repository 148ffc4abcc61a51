//! Transaction ledger: append-only payment records in `transaksi.csv`.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::LedgerClient;
use crate::framework::ResourceActor;
use crate::model::{timestamp_ids, Transaction};
use crate::store::RecordStore;

/// Creates a new ledger actor and its client.
pub fn new(
    buffer_size: usize,
    store: RecordStore<Transaction>,
) -> (ResourceActor<Transaction>, LedgerClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, store, timestamp_ids("TRX"));
    (actor, LedgerClient::new(generic_client))
}
