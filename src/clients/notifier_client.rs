use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::notifier::{NotifierError, NotifierRequest, StockNotification};

/// Client for the stock notifier.
#[derive(Clone)]
pub struct NotifierClient {
    sender: mpsc::Sender<NotifierRequest>,
}

impl NotifierClient {
    pub fn new(sender: mpsc::Sender<NotifierRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), NotifierError> {
        debug!("Sending shutdown request");
        self.sender
            .send(NotifierRequest::Shutdown)
            .await
            .map_err(|e| NotifierError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(NotifierClient => fn list_notifications() -> Vec<StockNotification> as NotifierRequest::ListNotifications, Error = NotifierError);
client_method!(NotifierClient => fn dismiss_notification(product_id: String) -> bool as NotifierRequest::DismissNotification, Error = NotifierError);
