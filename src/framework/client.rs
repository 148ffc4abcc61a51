use tokio::sync::{mpsc, oneshot};

use super::{Entity, FrameworkError, ResourceRequest, Response};

/// Cloneable handle to a [`ResourceActor`](super::ResourceActor).
#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(
        &self,
        id: T::Id,
        params: T::UpdateParams,
    ) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Update { id, params, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
