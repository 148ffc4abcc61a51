//! Flat-file persistence: one CSV file per entity set.
//!
//! Every entity set has a fixed column order declared by its [`Record`] impl. The
//! store never keeps records in memory; callers reload the whole set, mutate, and
//! write it back.

mod csv_store;
mod error;

pub use csv_store::*;
pub use error::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed row of an entity set.
///
/// Field declaration order must match [`Record::HEADERS`]; rows are serialized
/// positionally after the header is written.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Logical entity-set name, also the file stem (`produk` → `produk.csv`).
    const ENTITY_SET: &'static str;
    /// Column names in file order.
    const HEADERS: &'static [&'static str];
}
