use std::fmt::{Debug, Display};

use crate::store::Record;

/// Trait that any record type must implement to be managed by
/// [`ResourceActor`](super::ResourceActor).
pub trait Entity: Record + Debug {
    type Id: Eq + Clone + Send + Sync + Display + Debug + 'static;
    type CreateParams: Send + Sync + Debug + 'static;
    type UpdateParams: Send + Sync + Debug + 'static;
    type Action: Send + Sync + Debug + 'static;
    type ActionResult: Send + Sync + Debug + 'static;
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Builds the record from a freshly generated id and the create payload.
    /// The payload may carry its own id, which takes precedence.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, params: Self::UpdateParams) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;

    /// Read-only actions skip the rewrite and publish no event.
    fn is_read_only(_action: &Self::Action) -> bool {
        false
    }
}

/// Published after a change has been written to the file.
#[derive(Debug, Clone)]
pub enum EntityEvent<T: Entity> {
    Created(T),
    Updated(T),
    Deleted(T),
}

impl<T: Entity> EntityEvent<T> {
    pub fn entity(&self) -> &T {
        match self {
            EntityEvent::Created(item)
            | EntityEvent::Updated(item)
            | EntityEvent::Deleted(item) => item,
        }
    }
}
