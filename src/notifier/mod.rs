//! Low-stock notifications.
//!
//! The notifier observes product change events; it is not part of any order
//! operation. A product at or below the threshold has exactly one active
//! notification, replaced on every change and cleared once stock recovers or the
//! product is deleted.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::clients::NotifierClient;
use crate::framework::EntityEvent;
use crate::model::{now, Product};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifierError {
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Stock at or below the threshold.
    Warning,
    /// Out of stock.
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockNotification {
    pub product_id: String,
    pub product_name: String,
    pub remaining: u32,
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: NaiveDateTime,
}

impl StockNotification {
    /// Returns a notification when `product` is at or below `threshold`.
    pub fn for_product(product: &Product, threshold: u32) -> Option<Self> {
        if product.stock > threshold {
            return None;
        }
        let (level, message) = if product.stock == 0 {
            (NotificationLevel::Critical, format!("{} is out of stock!", product.name))
        } else {
            (
                NotificationLevel::Warning,
                format!("Only {} units of {} left!", product.stock, product.name),
            )
        };
        Some(Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            remaining: product.stock,
            level,
            message,
            raised_at: now(),
        })
    }
}

pub type NotifierResponse<T> = oneshot::Sender<Result<T, NotifierError>>;

#[derive(Debug)]
pub enum NotifierRequest {
    ListNotifications {
        respond_to: NotifierResponse<Vec<StockNotification>>,
    },
    DismissNotification {
        product_id: String,
        respond_to: NotifierResponse<bool>,
    },
    Shutdown,
}

pub struct StockNotifier {
    receiver: mpsc::Receiver<NotifierRequest>,
    events: broadcast::Receiver<EntityEvent<Product>>,
    threshold: u32,
    active: BTreeMap<String, StockNotification>,
}

impl StockNotifier {
    pub fn new(
        buffer_size: usize,
        events: broadcast::Receiver<EntityEvent<Product>>,
        threshold: u32,
    ) -> (Self, NotifierClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let notifier = Self {
            receiver,
            events,
            threshold,
            active: BTreeMap::new(),
        };
        (notifier, NotifierClient::new(sender))
    }

    /// Pending events are always drained before a request is served, so a request
    /// sent after a product change observes that change.
    #[instrument(name = "stock_notifier", fields(threshold = self.threshold), skip(self))]
    pub async fn run(mut self) {
        info!("StockNotifier starting");
        let mut events_open = true;

        loop {
            tokio::select! {
                biased;

                event = self.events.recv(), if events_open => match event {
                    Ok(event) => self.handle_event(event),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed product events"),
                    Err(RecvError::Closed) => {
                        debug!("Product events closed");
                        events_open = false;
                    }
                },

                msg = self.receiver.recv() => match msg {
                    Some(NotifierRequest::ListNotifications { respond_to }) => {
                        let _ = respond_to.send(Ok(self.active.values().cloned().collect()));
                    }
                    Some(NotifierRequest::DismissNotification { product_id, respond_to }) => {
                        let removed = self.active.remove(&product_id).is_some();
                        debug!(%product_id, removed, "Dismissed notification");
                        let _ = respond_to.send(Ok(removed));
                    }
                    Some(NotifierRequest::Shutdown) | None => {
                        info!("StockNotifier shutting down");
                        break;
                    }
                },
            }
        }

        info!("StockNotifier stopped");
    }

    fn handle_event(&mut self, event: EntityEvent<Product>) {
        let product = event.entity();
        let raised = match &event {
            EntityEvent::Deleted(_) => None,
            EntityEvent::Created(_) | EntityEvent::Updated(_) => {
                StockNotification::for_product(product, self.threshold)
            }
        };

        match raised {
            Some(notification) => {
                warn!(
                    product_id = %notification.product_id,
                    remaining = notification.remaining,
                    level = ?notification.level,
                    "{}",
                    notification.message
                );
                self.active.insert(notification.product_id.clone(), notification);
            }
            None => {
                if self.active.remove(&product.id).is_some() {
                    debug!(product_id = %product.id, "Stock notification cleared");
                }
            }
        }
    }
}
