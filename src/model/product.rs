use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product_actor::ProductError;
use crate::store::Record;

/// A product in the inventory.
///
/// `description` has no column in `produk.csv`; it lives in memory only and reads
/// back empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id_produk")]
    pub id: String,
    #[serde(rename = "nama_produk")]
    pub name: String,
    #[serde(rename = "kategori")]
    pub category: String,
    #[serde(rename = "harga", with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(rename = "stok")]
    pub stock: u32,
    #[serde(skip)]
    pub description: String,
    #[serde(with = "super::timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "super::timestamp")]
    pub updated_at: NaiveDateTime,
}

impl Record for Product {
    const ENTITY_SET: &'static str = "produk";
    const HEADERS: &'static [&'static str] = &[
        "id_produk",
        "nama_produk",
        "kategori",
        "harga",
        "stok",
        "created_at",
        "updated_at",
    ];
}

impl Product {
    /// Applies a signed stock change and returns the new level.
    ///
    /// Fails without touching the product when the result would be negative.
    pub fn apply_stock_delta(&mut self, delta: i64) -> Result<u32, ProductError> {
        let next = i64::from(self.stock) + delta;
        if next < 0 {
            return Err(ProductError::InsufficientStock {
                requested: u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX),
                available: self.stock,
            });
        }
        self.stock = u32::try_from(next)
            .map_err(|_| ProductError::ValidationError(format!("stock {} is out of range", next)))?;
        Ok(self.stock)
    }

    /// Sets a new price; negative prices are rejected.
    pub fn set_price(&mut self, price: Decimal) -> Result<(), ProductError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ProductError::ValidationError(format!(
                "price must not be negative, got {}",
                price
            )));
        }
        self.price = price;
        Ok(())
    }
}

/// Payload for registering a product.
///
/// Every field the repository requires is optional here so a missing value can be
/// reported as a validation error instead of being impossible to express.
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    /// Explicit id; a `PRD<timestamp>` id is generated when absent.
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub description: String,
}

impl ProductCreate {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        stock: u32,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            category: Some(category.into()),
            price: Some(price),
            stock: Some(stock),
            description: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Partial update; only the declared product fields can be changed.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::now;
    use crate::store::RecordStore;
    use tempfile::TempDir;

    fn product(id: &str, price: i64, stock: u32) -> Product {
        let stamp = now();
        Product {
            id: id.to_string(),
            name: format!("Produk {}", id),
            category: "Sembako".to_string(),
            price: Decimal::from(price),
            stock,
            description: String::new(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_stock_delta_applies_or_rejects() {
        let mut p = product("PRD1", 100_000, 5);

        assert_eq!(p.apply_stock_delta(3), Ok(8));
        assert_eq!(p.apply_stock_delta(-8), Ok(0));
        assert_eq!(
            p.apply_stock_delta(-1),
            Err(ProductError::InsufficientStock { requested: 1, available: 0 })
        );
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut p = product("PRD1", 100_000, 5);

        assert!(p.set_price(Decimal::new(-1, 0)).is_err());
        assert_eq!(p.price, Decimal::from(100_000));
        assert!(p.set_price(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_products_round_trip_through_store() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::<Product>::open(dir.path());
        let products: Vec<Product> = (1..=4)
            .map(|i| product(&format!("PRD{}", i), 1_500 * i, i as u32))
            .collect();

        store.write_all(&products).unwrap();
        let loaded = store.read_all_strict().unwrap();

        assert_eq!(loaded.len(), products.len());
        for (written, read) in products.iter().zip(&loaded) {
            assert_eq!(read.id, written.id);
            assert_eq!(read.name, written.name);
            assert_eq!(read.price, written.price);
            assert_eq!(read.stock, written.stock);
            assert_eq!(read.created_at, written.created_at);
        }
    }

    #[test]
    fn test_reads_rows_written_with_float_prices() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::<Product>::open(dir.path());
        std::fs::write(
            store.path(),
            "id_produk,nama_produk,kategori,harga,stok,created_at,updated_at\n\
             PRD20240101120000,Beras 5kg,Sembako,65000.0,12,2024-01-01T12:00:00.123456,2024-01-02T08:00:00\n",
        )
        .unwrap();

        let loaded = store.read_all_strict().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].price, Decimal::from(65_000));
        assert_eq!(loaded[0].stock, 12);
        assert_eq!(loaded[0].description, "");
    }
}
