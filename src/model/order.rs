use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Order status. The spellings are the literals stored in `pesanan.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    /// Completed.
    Selesai,
    /// Cancelled.
    Dibatalkan,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Selesai => "Selesai",
            OrderStatus::Dibatalkan => "Dibatalkan",
        }
    }

    /// Human wording used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Selesai => "completed",
            OrderStatus::Dibatalkan => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Selesai | OrderStatus::Dibatalkan)
    }

    /// Only `Pending` may move, and only to a terminal status.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self == OrderStatus::Pending && next.is_terminal()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(OrderStatus::Pending),
            "Selesai" => Ok(OrderStatus::Selesai),
            "Dibatalkan" => Ok(OrderStatus::Dibatalkan),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// A customer order for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "id_pesanan")]
    pub id: String,
    #[serde(rename = "id_pelanggan")]
    pub customer_id: String,
    #[serde(rename = "id_produk")]
    pub product_id: String,
    #[serde(rename = "jumlah_dipesan")]
    pub quantity: u32,
    #[serde(rename = "total_harga", with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub status: OrderStatus,
    #[serde(rename = "tanggal_pesanan", with = "super::timestamp")]
    pub created_at: NaiveDateTime,
}

impl Record for Order {
    const ENTITY_SET: &'static str = "pesanan";
    const HEADERS: &'static [&'static str] = &[
        "id_pesanan",
        "id_pelanggan",
        "id_produk",
        "jumlah_dipesan",
        "total_harga",
        "status",
        "tanggal_pesanan",
    ];
}

impl Order {
    /// `quantity × unit_price`, or `None` when the product overflows a `Decimal`.
    pub fn line_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
        unit_price.checked_mul(Decimal::from(quantity))
    }

    /// A new `Pending` order priced at `quantity × unit_price`.
    ///
    /// Returns `None` when the total price does not fit a `Decimal`.
    pub fn pending(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        created_at: NaiveDateTime,
    ) -> Option<Self> {
        Some(Self {
            id: id.into(),
            customer_id: customer_id.into(),
            product_id: product_id.into(),
            quantity,
            total_price: Self::line_total(unit_price, quantity)?,
            status: OrderStatus::Pending,
            created_at,
        })
    }
}

/// Request to place an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    /// Explicit id; an `ORD<timestamp>` id is generated when absent.
    pub id: Option<String>,
    pub customer_id: String,
    pub product_id: String,
    pub quantity: u32,
}

impl OrderCreate {
    pub fn new(
        customer_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: None,
            customer_id: customer_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Request to change a pending order. Absent fields keep their current value.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub id: String,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<u32>,
}

impl OrderUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            customer_id: None,
            product_id: None,
            quantity: None,
        }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}
