use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::{OrderError, OrderRequest};
use crate::clients::{LedgerClient, OrderClient, ProductClient};
use crate::model::{
    now, timestamp_ids, Order, OrderCreate, OrderStatus, OrderUpdate, Transaction,
    TransactionCreate,
};
use crate::product_actor::ProductError;
use crate::store::RecordStore;

/// Root actor of the order lifecycle.
///
/// Orders are never cached: every request reloads `pesanan.csv`, mutates, and
/// rewrites it. Requests are served one at a time, so two cancels of the same order
/// cannot both restore stock.
///
/// Multi-step operations undo their earlier steps when a later one fails:
/// - create: the appended order is removed when the stock decrement fails
/// - cancel: the status goes back to `Pending` when stock cannot be restored
/// - mark done: the status goes back to `Pending` when the transaction is not recorded
/// - update: applied stock changes are reversed when a later step fails
pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    store: RecordStore<Order>,
    product_client: ProductClient,
    ledger_client: LedgerClient,
    next_id_fn: Box<dyn Fn() -> String + Send + Sync>,
    default_payment_method: String,
}

impl OrderService {
    pub fn new(
        buffer_size: usize,
        store: RecordStore<Order>,
        product_client: ProductClient,
        ledger_client: LedgerClient,
        default_payment_method: impl Into<String>,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store,
            product_client,
            ledger_client,
            next_id_fn: Box::new(timestamp_ids("ORD")),
            default_payment_method: default_payment_method.into(),
        };
        (service, OrderClient::new(sender))
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::CreateOrder { request, respond_to } => {
                    let _ = respond_to.send(self.handle_create_order(request).await);
                }
                OrderRequest::GetOrder { id, respond_to } => {
                    let _ = respond_to.send(self.handle_get_order(id));
                }
                OrderRequest::ListOrders { status, respond_to } => {
                    let _ = respond_to.send(self.handle_list_orders(status));
                }
                OrderRequest::UpdateOrder { request, respond_to } => {
                    let _ = respond_to.send(self.handle_update_order(request).await);
                }
                OrderRequest::CancelOrder { id, respond_to } => {
                    let _ = respond_to.send(self.handle_cancel_order(id).await);
                }
                OrderRequest::CompleteOrder { id, payment_method, respond_to } => {
                    let _ = respond_to.send(self.handle_complete_order(id, payment_method).await);
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }

        info!("OrderService stopped");
    }

    /// Validates the request, checks stock, appends a `Pending` order and then takes
    /// the quantity out of stock.
    #[instrument(
        fields(
            customer_id = %request.customer_id,
            product_id = %request.product_id,
            quantity = %request.quantity
        ),
        skip(self, request)
    )]
    async fn handle_create_order(&mut self, request: OrderCreate) -> Result<Order, OrderError> {
        info!("Processing create_order request");

        if request.quantity == 0 {
            warn!("Rejected zero quantity");
            return Err(OrderError::ValidationError("quantity must be greater than zero".into()));
        }
        let customer_id = required(&request.customer_id, "customer_id")?;
        let product_id = required(&request.product_id, "product_id")?;

        let product = match self.product_client.get_product(product_id.clone()).await {
            Ok(Some(product)) => {
                debug!(
                    product_name = %product.name,
                    stock = product.stock,
                    "Product validation successful"
                );
                product
            }
            Ok(None) => {
                error!("Product not found");
                return Err(OrderError::InvalidProduct(product_id));
            }
            Err(e) => {
                error!(error = %e, "Product validation failed");
                return Err(e.into());
            }
        };

        if request.quantity > product.stock {
            warn!(available = product.stock, "Insufficient stock");
            return Err(OrderError::InsufficientStock {
                requested: request.quantity,
                available: product.stock,
            });
        }

        let id = request
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| (self.next_id_fn)());
        if self.store.read_all_strict()?.iter().any(|order| order.id == id) {
            warn!(order_id = %id, "Duplicate order id");
            return Err(OrderError::AlreadyExists(id));
        }

        let quantity = request.quantity;
        let order = Order::pending(id, customer_id, product_id, quantity, product.price, now())
            .ok_or_else(|| {
                warn!(price = %product.price, quantity, "Total price overflows");
                total_overflow()
            })?;
        self.store.append(&order).map_err(|e| {
            error!(error = %e, "Failed to append order");
            OrderError::from(e)
        })?;

        match self
            .product_client
            .reserve_stock(order.product_id.clone(), order.quantity)
            .await
        {
            Ok(remaining) => {
                info!(order_id = %order.id, total = %order.total_price, remaining, "Order created");
                Ok(order)
            }
            Err(e) => {
                error!(order_id = %order.id, error = %e, "Stock decrement failed, removing order");
                if let Err(undo) = self.remove_order(&order.id) {
                    error!(order_id = %order.id, error = %undo, "Compensating delete failed");
                }
                Err(e.into())
            }
        }
    }

    #[instrument(fields(order_id = %id), skip(self))]
    fn handle_get_order(&self, id: String) -> Result<Option<Order>, OrderError> {
        debug!("Processing get_order request");

        let order = self.store.read_all()?.into_iter().find(|order| order.id == id);
        match &order {
            Some(order) => debug!(status = %order.status, "Order found"),
            None => debug!("Order not found"),
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    fn handle_list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
        debug!("Processing list_orders request");

        let orders: Vec<Order> = self
            .store
            .read_all()?
            .into_iter()
            .filter(|order| status.map_or(true, |status| order.status == status))
            .collect();
        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Marks a pending order `Dibatalkan` and puts its quantity back into stock.
    #[instrument(fields(order_id = %id), skip(self))]
    async fn handle_cancel_order(&mut self, id: String) -> Result<Order, OrderError> {
        info!("Processing cancel_order request");

        let mut orders = self.store.read_all_strict()?;
        let index = transition(&mut orders, &id, OrderStatus::Dibatalkan)?;
        self.store.write_all(&orders)?;
        let order = orders[index].clone();

        match self
            .product_client
            .restore_stock(order.product_id.clone(), order.quantity)
            .await
        {
            Ok(stock) => {
                info!(product_id = %order.product_id, stock, "Order cancelled, stock restored")
            }
            Err(ProductError::NotFound(product_id)) => {
                warn!(
                    %product_id,
                    "Order cancelled, product no longer exists so no stock was restored"
                );
            }
            Err(e) => {
                error!(error = %e, "Stock restore failed, reverting order to Pending");
                orders[index].status = OrderStatus::Pending;
                if let Err(undo) = self.store.write_all(&orders) {
                    error!(error = %undo, "Status rollback failed");
                }
                return Err(OrderError::StockUpdateFailed(e.to_string()));
            }
        }

        Ok(order)
    }

    /// Marks a pending order `Selesai` and records its payment.
    #[instrument(fields(order_id = %id), skip(self))]
    async fn handle_complete_order(
        &mut self,
        id: String,
        payment_method: Option<String>,
    ) -> Result<Transaction, OrderError> {
        info!("Processing complete_order request");

        let mut orders = self.store.read_all_strict()?;
        let index = transition(&mut orders, &id, OrderStatus::Selesai)?;
        self.store.write_all(&orders)?;

        let payment = TransactionCreate {
            order_id: orders[index].id.clone(),
            total_price: orders[index].total_price,
            payment_method: payment_method
                .map(|method| method.trim().to_string())
                .filter(|method| !method.is_empty())
                .unwrap_or_else(|| self.default_payment_method.clone()),
        };

        match self.ledger_client.record_transaction(payment).await {
            Ok(transaction) => {
                info!(
                    transaction_id = %transaction.id,
                    total = %transaction.total_price,
                    "Order completed"
                );
                Ok(transaction)
            }
            Err(e) => {
                error!(error = %e, "Transaction not recorded, reverting order to Pending");
                orders[index].status = OrderStatus::Pending;
                if let Err(undo) = self.store.write_all(&orders) {
                    error!(error = %undo, "Status rollback failed");
                }
                Err(e.into())
            }
        }
    }

    /// Changes quantity, product or customer of a pending order, moving stock by the
    /// difference.
    #[instrument(fields(order_id = %request.id), skip(self, request))]
    async fn handle_update_order(&mut self, request: OrderUpdate) -> Result<Order, OrderError> {
        info!("Processing update_order request");

        let mut orders = self.store.read_all_strict()?;
        let index = orders
            .iter()
            .position(|order| order.id == request.id)
            .ok_or_else(|| OrderError::NotFound(request.id.clone()))?;
        let current = orders[index].clone();
        if current.status != OrderStatus::Pending {
            warn!(status = %current.status, "Only pending orders can be updated");
            return Err(OrderError::InvalidStateTransition {
                id: current.id,
                from: current.status,
                to: OrderStatus::Pending,
            });
        }

        let quantity = request.quantity.unwrap_or(current.quantity);
        if quantity == 0 {
            return Err(OrderError::ValidationError("quantity must be greater than zero".into()));
        }
        let product_id =
            non_blank(request.product_id).unwrap_or_else(|| current.product_id.clone());
        let customer_id =
            non_blank(request.customer_id).unwrap_or_else(|| current.customer_id.clone());

        let product = match self.product_client.get_product(product_id.clone()).await? {
            Some(product) => product,
            None => {
                error!(%product_id, "Product not found");
                return Err(OrderError::InvalidProduct(product_id));
            }
        };

        let total_price = Order::line_total(product.price, quantity).ok_or_else(|| {
            warn!(price = %product.price, quantity, "Total price overflows");
            total_overflow()
        })?;

        let applied = self.move_stock(&current, &product_id, quantity).await?;

        let order = &mut orders[index];
        order.customer_id = customer_id;
        order.product_id = product_id;
        order.quantity = quantity;
        order.total_price = total_price;
        order.status = OrderStatus::Pending;
        order.created_at = now();
        let updated = order.clone();

        if let Err(e) = self.store.write_all(&orders) {
            error!(error = %e, "Failed to persist order update, reversing stock changes");
            self.reverse_stock(&applied).await;
            return Err(e.into());
        }

        info!(quantity, total = %updated.total_price, "Order updated");
        Ok(updated)
    }

    /// Applies the stock changes an order update implies and returns them so they can
    /// be reversed.
    async fn move_stock(
        &self,
        current: &Order,
        product_id: &str,
        quantity: u32,
    ) -> Result<Vec<(String, i64)>, OrderError> {
        let mut applied = Vec::new();

        if current.product_id == product_id {
            let delta = i64::from(current.quantity) - i64::from(quantity);
            if delta != 0 {
                let stock = self.product_client.update_stock(product_id.to_string(), delta).await?;
                debug!(delta, stock, "Stock adjusted");
                applied.push((product_id.to_string(), delta));
            }
            return Ok(applied);
        }

        self.product_client.reserve_stock(product_id.to_string(), quantity).await?;
        applied.push((product_id.to_string(), -i64::from(quantity)));

        match self
            .product_client
            .restore_stock(current.product_id.clone(), current.quantity)
            .await
        {
            Ok(_) => applied.push((current.product_id.clone(), i64::from(current.quantity))),
            Err(ProductError::NotFound(old)) => {
                warn!(product_id = %old, "Previous product no longer exists")
            }
            Err(e) => {
                error!(error = %e, "Failed to restore stock of previous product");
                self.reverse_stock(&applied).await;
                return Err(OrderError::StockUpdateFailed(e.to_string()));
            }
        }
        Ok(applied)
    }

    async fn reverse_stock(&self, applied: &[(String, i64)]) {
        for (product_id, delta) in applied.iter().rev() {
            if let Err(e) = self.product_client.update_stock(product_id.clone(), -delta).await {
                error!(%product_id, delta, error = %e, "Failed to reverse stock change");
            }
        }
    }

    fn remove_order(&self, id: &str) -> Result<(), OrderError> {
        let mut orders = self.store.read_all_strict()?;
        orders.retain(|order| order.id != id);
        self.store.write_all(&orders)?;
        Ok(())
    }
}

/// Moves the order with `id` to `next`, returning its index.
fn transition(orders: &mut [Order], id: &str, next: OrderStatus) -> Result<usize, OrderError> {
    let index = orders
        .iter()
        .position(|order| order.id == id)
        .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
    let order = &mut orders[index];
    if !order.status.can_transition_to(next) {
        warn!(status = %order.status, "Invalid state transition");
        return Err(OrderError::InvalidStateTransition {
            id: order.id.clone(),
            from: order.status,
            to: next,
        });
    }
    order.status = next;
    Ok(index)
}

fn required(value: &str, field: &str) -> Result<String, OrderError> {
    non_blank(Some(value.to_string()))
        .ok_or_else(|| OrderError::ValidationError(format!("missing required field: {}", field)))
}

fn total_overflow() -> OrderError {
    OrderError::ValidationError("total price is too large".into())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: OrderStatus) -> Order {
        let mut order =
            Order::pending(id, "C1", "PRD1", 2, rust_decimal::Decimal::from(10), now()).unwrap();
        order.status = status;
        order
    }

    #[test]
    fn test_transition_moves_pending_only() {
        let mut orders = vec![
            order("ORD1", OrderStatus::Pending),
            order("ORD2", OrderStatus::Selesai),
        ];

        assert_eq!(transition(&mut orders, "ORD1", OrderStatus::Dibatalkan), Ok(0));
        assert_eq!(orders[0].status, OrderStatus::Dibatalkan);

        assert_eq!(
            transition(&mut orders, "ORD2", OrderStatus::Dibatalkan),
            Err(OrderError::InvalidStateTransition {
                id: "ORD2".into(),
                from: OrderStatus::Selesai,
                to: OrderStatus::Dibatalkan,
            })
        );
        assert_eq!(orders[1].status, OrderStatus::Selesai);
        assert_eq!(
            transition(&mut orders, "ORD9", OrderStatus::Selesai),
            Err(OrderError::NotFound("ORD9".into()))
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = OrderError::InvalidStateTransition {
            id: "ORD1".into(),
            from: OrderStatus::Dibatalkan,
            to: OrderStatus::Selesai,
        };
        assert_eq!(err.to_string(), "Order ORD1 cannot become Selesai: it is already cancelled");
    }

    #[test]
    fn test_required_treats_blank_as_missing() {
        assert_eq!(required(" C1 ", "customer_id"), Ok("C1".to_string()));
        assert_eq!(
            required("  ", "customer_id"),
            Err(OrderError::ValidationError("missing required field: customer_id".into()))
        );
    }
}
