use tracing::{debug, instrument};

use crate::framework::ResourceClient;
use crate::model::{Product, ProductCreate, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: String,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await {
            Ok(ProductActionResult::StockLevel(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(e.into()),
        }
    }

    /// Takes `quantity` units out of stock and returns the remaining level.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        self.change_stock(id, ProductAction::ReserveStock(quantity)).await
    }

    /// Puts `quantity` units back and returns the new level.
    #[instrument(skip(self))]
    pub async fn restore_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        self.change_stock(id, ProductAction::RestoreStock(quantity)).await
    }

    /// Applies a signed stock change. Fails without mutation when the result would
    /// be negative.
    #[instrument(skip(self))]
    pub async fn update_stock(&self, id: String, delta: i64) -> Result<u32, ProductError> {
        self.change_stock(id, ProductAction::AdjustStock(delta)).await
    }

    async fn change_stock(&self, id: String, action: ProductAction) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, action).await {
            Ok(ProductActionResult::StockChanged { current, .. }) => Ok(current),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(e.into()),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
