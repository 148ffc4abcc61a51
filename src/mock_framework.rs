//! # Mock Framework
//!
//! Utilities for testing actor clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers like
//! [`expect_get`] or [`expect_action`] to inspect each request and choose the reply.
//! Replying with an error simulates a failing actor, which is how the compensation
//! paths of the order service are exercised.

use tokio::sync::mpsc;

use crate::framework::{Entity, ResourceClient, ResourceRequest, Response};

/// Creates a client whose requests arrive on the returned receiver instead of a
/// running [`ResourceActor`](crate::framework::ResourceActor).
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a List request.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<T>, T::Error>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message must be an Action request.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{LedgerClient, ProductClient};
    use crate::framework::FrameworkError;
    use crate::ledger_actor::LedgerError;
    use crate::model::{now, Product, Transaction, TransactionCreate};
    use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_mock_ledger_client() {
        let (inner, mut receiver) = create_mock_client::<Transaction>(10);
        let client = LedgerClient::new(inner);

        let record_task = tokio::spawn(async move {
            let payment = TransactionCreate {
                order_id: "ORD1".into(),
                total_price: Decimal::from(200_000),
                payment_method: "Tunai".into(),
            };
            client.record_transaction(payment).await
        });

        let (payment, responder) =
            expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payment.order_id, "ORD1");
        responder.send(Err(FrameworkError::Storage("disk full".into()))).unwrap();

        let result = record_task.await.unwrap();
        assert_eq!(result, Err(LedgerError::PersistenceError("disk full".into())));
    }

    #[tokio::test]
    async fn test_mock_product_client_stock_action() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        let reserve_task =
            tokio::spawn(async move { client.reserve_stock("PRD1".into(), 3).await });

        let (id, action, responder) =
            expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, "PRD1");
        assert_eq!(action, ProductAction::ReserveStock(3));
        responder
            .send(Ok(ProductActionResult::StockChanged { previous: 5, current: 2 }))
            .unwrap();

        assert_eq!(reserve_task.await.unwrap(), Ok(2));
    }

    #[tokio::test]
    async fn test_mock_list_and_dropped_reply() {
        let (inner, mut receiver) = create_mock_client::<Product>(10);
        let client = ProductClient::new(inner);

        let list_client = client.clone();
        let list_task = tokio::spawn(async move { list_client.list_products().await });
        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        let stamp = now();
        let product = Product {
            id: "PRD1".into(),
            name: "Gula".into(),
            category: "Sembako".into(),
            price: Decimal::from(15_000),
            stock: 4,
            description: String::new(),
            created_at: stamp,
            updated_at: stamp,
        };
        responder.send(Ok(vec![product.clone()])).unwrap();
        assert_eq!(list_task.await.unwrap(), Ok(vec![product]));

        let get_task = tokio::spawn(async move { client.get_product("PRD1".into()).await });
        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);
        assert!(matches!(
            get_task.await.unwrap(),
            Err(ProductError::ActorCommunicationError(_))
        ));
    }
}
