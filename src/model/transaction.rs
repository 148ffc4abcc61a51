use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Payment method recorded when none is given.
pub const DEFAULT_PAYMENT_METHOD: &str = "Tunai";

/// Payment record of a completed order. Never changed once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "id_transaksi")]
    pub id: String,
    #[serde(rename = "id_pesanan")]
    pub order_id: String,
    #[serde(rename = "total_harga", with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(rename = "metode_pembayaran")]
    pub payment_method: String,
    #[serde(rename = "tanggal_transaksi", with = "super::timestamp")]
    pub timestamp: NaiveDateTime,
}

impl Record for Transaction {
    const ENTITY_SET: &'static str = "transaksi";
    const HEADERS: &'static [&'static str] = &[
        "id_transaksi",
        "id_pesanan",
        "total_harga",
        "metode_pembayaran",
        "tanggal_transaksi",
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCreate {
    pub order_id: String,
    pub total_price: Decimal,
    pub payment_method: String,
}
