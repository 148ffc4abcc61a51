use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use super::{Entity, EntityEvent, FrameworkError, ResourceClient};
use crate::store::RecordStore;

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        params: T::UpdateParams,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

/// Owns one entity-set file and serves requests sequentially.
///
/// The file is the source of truth: every request reloads it, mutations rewrite it
/// (or append, for creates) before replying.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: RecordStore<T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
    events: Option<broadcast::Sender<EntityEvent<T>>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        store: RecordStore<T>,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store,
            next_id_fn: Box::new(next_id_fn),
            events: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Publishes every committed change on `events`.
    pub fn with_events(mut self, events: broadcast::Sender<EntityEvent<T>>) -> Self {
        self.events = Some(events);
        self
    }

    #[instrument(name = "resource_actor", fields(entity_set = T::ENTITY_SET), skip(self))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(self.handle_get(id));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(self.handle_list());
                }
                ResourceRequest::Update { id, params, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, params));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }

        info!("ResourceActor stopped");
    }

    #[instrument(skip(self, params))]
    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        debug!("Processing create request");

        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id, params).map_err(|e| {
            warn!(error = %e, "Create rejected");
            FrameworkError::Entity(e)
        })?;
        item.on_create().map_err(FrameworkError::Entity)?;

        let existing = self.store.read_all_strict()?;
        if existing.iter().any(|other| other.id() == item.id()) {
            warn!(id = %item.id(), "Duplicate id");
            return Err(FrameworkError::AlreadyExists(item.id().to_string()));
        }

        self.store.append(&item).map_err(|e| {
            error!(error = %e, "Append failed");
            FrameworkError::from(e)
        })?;

        info!(id = %item.id(), "Created");
        self.publish(EntityEvent::Created(item.clone()));
        Ok(item)
    }

    #[instrument(fields(id = %id), skip(self))]
    fn handle_get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        debug!("Processing get request");
        let item = self.store.read_all()?.into_iter().find(|item| item.id() == &id);
        if item.is_none() {
            debug!("Not found");
        }
        Ok(item)
    }

    #[instrument(skip(self))]
    fn handle_list(&self) -> Result<Vec<T>, FrameworkError<T::Error>> {
        debug!("Processing list request");
        let items = self.store.read_all()?;
        debug!(count = items.len(), "Listed");
        Ok(items)
    }

    #[instrument(fields(id = %id), skip(self, params))]
    fn handle_update(
        &mut self,
        id: T::Id,
        params: T::UpdateParams,
    ) -> Result<T, FrameworkError<T::Error>> {
        debug!("Processing update request");

        let mut items = self.store.read_all_strict()?;
        let item = items
            .iter_mut()
            .find(|item| item.id() == &id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(params).map_err(|e| {
            warn!(error = %e, "Update rejected");
            FrameworkError::Entity(e)
        })?;
        let updated = item.clone();

        self.persist(&items)?;
        info!("Updated");
        self.publish(EntityEvent::Updated(updated.clone()));
        Ok(updated)
    }

    #[instrument(fields(id = %id), skip(self))]
    fn handle_delete(&mut self, id: T::Id) -> Result<T, FrameworkError<T::Error>> {
        debug!("Processing delete request");

        let mut items = self.store.read_all_strict()?;
        let position = items
            .iter()
            .position(|item| item.id() == &id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        items[position].on_delete().map_err(|e| {
            warn!(error = %e, "Delete rejected");
            FrameworkError::Entity(e)
        })?;
        let removed = items.remove(position);

        self.persist(&items)?;
        info!("Deleted");
        self.publish(EntityEvent::Deleted(removed.clone()));
        Ok(removed)
    }

    #[instrument(fields(id = %id, action = ?action), skip(self))]
    fn handle_action(
        &mut self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        debug!("Processing action request");

        let read_only = T::is_read_only(&action);
        let mut items = if read_only {
            self.store.read_all()?
        } else {
            self.store.read_all_strict()?
        };
        let item = items
            .iter_mut()
            .find(|item| item.id() == &id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let result = item.handle_action(action).map_err(|e| {
            warn!(error = %e, "Action rejected");
            FrameworkError::Entity(e)
        })?;
        if read_only {
            return Ok(result);
        }
        let updated = item.clone();

        self.persist(&items)?;
        debug!("Action applied");
        self.publish(EntityEvent::Updated(updated));
        Ok(result)
    }

    fn persist(&self, items: &[T]) -> Result<(), FrameworkError<T::Error>> {
        self.store.write_all(items).map_err(|e| {
            error!(error = %e, "Rewrite failed");
            FrameworkError::from(e)
        })
    }

    fn publish(&self, event: EntityEvent<T>) {
        if let Some(events) = &self.events {
            // no subscribers is fine
            let _ = events.send(event);
        }
    }
}
