use tokio::sync::oneshot;

use super::OrderError;
use crate::model::{Order, OrderCreate, OrderStatus, OrderUpdate, Transaction};

pub type ServiceResponse<T> = oneshot::Sender<Result<T, OrderError>>;

#[derive(Debug)]
pub enum OrderRequest {
    CreateOrder {
        request: OrderCreate,
        respond_to: ServiceResponse<Order>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>>,
    },
    ListOrders {
        status: Option<OrderStatus>,
        respond_to: ServiceResponse<Vec<Order>>,
    },
    UpdateOrder {
        request: OrderUpdate,
        respond_to: ServiceResponse<Order>,
    },
    CancelOrder {
        id: String,
        respond_to: ServiceResponse<Order>,
    },
    CompleteOrder {
        id: String,
        payment_method: Option<String>,
        respond_to: ServiceResponse<Transaction>,
    },
    Shutdown,
}
