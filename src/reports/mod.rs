//! Sales and stock reporting.
//!
//! Reports read the entity-set files directly, without going through the actors.
//! Rewrites are atomic renames, so a report sees either the old or the new file.

mod aggregate;

pub use aggregate::*;

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, instrument};

use crate::model::{Order, Product, Transaction};
use crate::store::{RecordStore, StoreError};

/// Read-only view over the data directory.
#[derive(Debug, Clone)]
pub struct Reporter {
    products: RecordStore<Product>,
    orders: RecordStore<Order>,
    transactions: RecordStore<Transaction>,
    low_stock_threshold: u32,
}

impl Reporter {
    pub fn open(data_dir: impl AsRef<Path>, low_stock_threshold: u32) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            products: RecordStore::open(data_dir),
            orders: RecordStore::open(data_dir),
            transactions: RecordStore::open(data_dir),
            low_stock_threshold,
        }
    }

    #[instrument(skip(self))]
    pub fn sales_report(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<SalesReport, StoreError> {
        let report = sales_report(
            &self.transactions.read_all()?,
            &self.orders.read_all()?,
            &self.products.read_all()?,
            start,
            end,
        );
        debug!(
            count = report.transaction_count,
            total = %report.total_revenue,
            "Sales report built"
        );
        Ok(report)
    }

    #[instrument(skip(self))]
    pub fn top_products(&self, limit: usize) -> Result<Vec<ProductSales>, StoreError> {
        Ok(top_products(&self.orders.read_all()?, &self.products.read_all()?, limit))
    }

    /// Products with `stock <= threshold`.
    #[instrument(skip(self))]
    pub fn low_stock(&self, threshold: u32) -> Result<Vec<Product>, StoreError> {
        Ok(low_stock(&self.products.read_all()?, threshold))
    }

    #[instrument(skip(self))]
    pub fn sales_by_period(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        period: Period,
    ) -> Result<Vec<PeriodSales>, StoreError> {
        Ok(sales_by_period(&self.transactions.read_all()?, start, end, period))
    }

    #[instrument(skip(self))]
    pub fn stock_by_category(&self) -> Result<Vec<CategoryStock>, StoreError> {
        Ok(stock_by_category(&self.products.read_all()?, self.low_stock_threshold))
    }

    #[instrument(skip(self))]
    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard, StoreError> {
        Ok(dashboard(
            &self.products.read_all()?,
            &self.orders.read_all()?,
            today,
            self.low_stock_threshold,
        ))
    }
}
