use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::model::{Order, OrderCreate, OrderStatus, OrderUpdate, Transaction};
use crate::order_service::{OrderError, OrderRequest};

/// Client for the order service.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), OrderError> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(OrderClient => fn create_order(request: OrderCreate) -> Order as OrderRequest::CreateOrder, Error = OrderError);
client_method!(OrderClient => fn get_order(id: String) -> Option<Order> as OrderRequest::GetOrder, Error = OrderError);
client_method!(OrderClient => fn list_orders(status: Option<OrderStatus>) -> Vec<Order> as OrderRequest::ListOrders, Error = OrderError);
client_method!(OrderClient => fn update_order(request: OrderUpdate) -> Order as OrderRequest::UpdateOrder, Error = OrderError);
client_method!(OrderClient => fn cancel_order(id: String) -> Order as OrderRequest::CancelOrder, Error = OrderError);
client_method!(OrderClient => fn complete_order(id: String, payment_method: Option<String>) -> Transaction as OrderRequest::CompleteOrder, Error = OrderError);
