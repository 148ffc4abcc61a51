//! Product repository: products managed by a [`ResourceActor`] over `produk.csv`,
//! including stock management actions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use tokio::sync::broadcast;

use crate::clients::ProductClient;
use crate::framework::{EntityEvent, ResourceActor};
use crate::model::{timestamp_ids, Product};
use crate::store::RecordStore;

/// Creates a new Product actor and its client.
///
/// Committed product changes are published on `events`.
pub fn new(
    buffer_size: usize,
    store: RecordStore<Product>,
    events: broadcast::Sender<EntityEvent<Product>>,
) -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, store, timestamp_ids("PRD"));
    (actor.with_events(events), ProductClient::new(generic_client))
}
