//! Generic single-writer actor over one entity-set file.
//!
//! - [`Entity`]: the hooks a record type implements to be managed by an actor
//! - [`ResourceActor`]: owns the [`RecordStore`](crate::store::RecordStore) and
//!   serves requests one at a time, reloading the file for every request
//! - [`ResourceClient`]: cloneable handle that sends requests and awaits replies
//! - [`EntityEvent`]: change notifications published after a successful write

mod actor;
mod client;
mod entity;
mod error;

pub use actor::*;
pub use client::*;
pub use entity::*;
pub use error::*;
