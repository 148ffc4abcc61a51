use rust_decimal::Decimal;

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::framework::Entity;
use crate::model::{now, Product, ProductCreate, ProductUpdate};

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type UpdateParams = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Builds a product after checking the required fields.
    ///
    /// # Required
    /// `name`, `category`, `price`, `stock`; blank strings count as missing.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        let name = required_text(params.name, "name")?;
        let category = required_text(params.category, "category")?;
        let price = params.price.ok_or_else(|| missing("price"))?;
        let stock = params.stock.ok_or_else(|| missing("stock"))?;
        let id = params
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or(id);

        let stamp = now();
        let mut product = Self {
            id,
            name,
            category,
            price: Decimal::ZERO,
            stock,
            description: params.description,
            created_at: stamp,
            updated_at: stamp,
        };
        product.set_price(price)?;
        Ok(product)
    }

    /// Merges the given fields and re-stamps `updated_at`.
    fn on_update(&mut self, update: ProductUpdate) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            self.name = required_text(Some(name), "name")?;
        }
        if let Some(category) = update.category {
            self.category = required_text(Some(category), "category")?;
        }
        if let Some(price) = update.price {
            self.set_price(price)?;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        self.updated_at = now();
        Ok(())
    }

    fn handle_action(
        &mut self,
        action: ProductAction,
    ) -> Result<ProductActionResult, ProductError> {
        let delta = match action {
            ProductAction::CheckStock => return Ok(ProductActionResult::StockLevel(self.stock)),
            ProductAction::ReserveStock(quantity) => -i64::from(quantity),
            ProductAction::RestoreStock(quantity) => i64::from(quantity),
            ProductAction::AdjustStock(delta) => delta,
        };
        let previous = self.stock;
        let current = self.apply_stock_delta(delta)?;
        self.updated_at = now();
        Ok(ProductActionResult::StockChanged { previous, current })
    }

    fn is_read_only(action: &ProductAction) -> bool {
        matches!(action, ProductAction::CheckStock)
    }
}

fn missing(field: &str) -> ProductError {
    ProductError::ValidationError(format!("missing required field: {}", field))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, ProductError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}
