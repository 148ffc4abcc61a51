use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::model::{Order, OrderStatus, Product, Transaction, MISSING};

/// One transaction joined with its order and product.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesLine {
    pub transaction_id: String,
    pub order_id: String,
    pub timestamp: NaiveDateTime,
    pub customer_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub total_price: Decimal,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub lines: Vec<SalesLine>,
    pub total_revenue: Decimal,
    pub transaction_count: usize,
    pub average_sale: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    /// Weeks start on Monday.
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// First day of the bucket containing `date`.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Daily => date,
            Period::Weekly => date - Days::new(u64::from(date.weekday().num_days_from_monday())),
            Period::Monthly => date.with_day(1).unwrap_or(date),
            Period::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSales {
    pub period_start: NaiveDate,
    pub revenue: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStock {
    pub category: String,
    pub product_count: usize,
    pub total_stock: u64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub stock_value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub product_count: usize,
    pub low_stock_count: usize,
    pub orders_today: usize,
    pub revenue_today: Decimal,
}

/// Transactions with `start <= timestamp <= end`, joined to their order and product.
///
/// A missing order or product shows as `"-"`; a missing order counts as quantity 1.
pub fn sales_report(
    transactions: &[Transaction],
    orders: &[Order],
    products: &[Product],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> SalesReport {
    let lines: Vec<SalesLine> = transactions
        .iter()
        .filter(|trx| start <= trx.timestamp && trx.timestamp <= end)
        .map(|trx| {
            let order = orders.iter().find(|order| order.id == trx.order_id);
            let product =
                order.and_then(|order| products.iter().find(|p| p.id == order.product_id));
            SalesLine {
                transaction_id: trx.id.clone(),
                order_id: trx.order_id.clone(),
                timestamp: trx.timestamp,
                customer_id: order.map_or_else(|| MISSING.to_string(), |o| o.customer_id.clone()),
                product_name: product.map_or_else(|| MISSING.to_string(), |p| p.name.clone()),
                quantity: order.map_or(1, |o| o.quantity),
                total_price: trx.total_price,
                payment_method: trx.payment_method.clone(),
            }
        })
        .collect();

    let total_revenue = saturating_sum(lines.iter().map(|line| line.total_price));
    let transaction_count = lines.len();
    let average_sale = if transaction_count == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(transaction_count)
    };

    SalesReport {
        start,
        end,
        lines,
        total_revenue,
        transaction_count,
        average_sale,
    }
}

/// Best sellers by ordered quantity over every order, whatever its status. Ties are
/// ordered by product id.
pub fn top_products(orders: &[Order], products: &[Product], limit: usize) -> Vec<ProductSales> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for order in orders {
        let total = totals.entry(order.product_id.as_str()).or_default();
        *total = total.saturating_add(u64::from(order.quantity));
    }

    let mut ranked: Vec<ProductSales> = totals
        .into_iter()
        .map(|(product_id, quantity)| ProductSales {
            product_id: product_id.to_string(),
            product_name: products
                .iter()
                .find(|p| p.id == product_id)
                .map_or_else(|| MISSING.to_string(), |p| p.name.clone()),
            quantity,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

pub fn low_stock(products: &[Product], threshold: u32) -> Vec<Product> {
    products.iter().filter(|p| p.stock <= threshold).cloned().collect()
}

/// Revenue and transaction count per period bucket, oldest first. Buckets without
/// transactions are omitted.
pub fn sales_by_period(
    transactions: &[Transaction],
    start: NaiveDateTime,
    end: NaiveDateTime,
    period: Period,
) -> Vec<PeriodSales> {
    let mut buckets: BTreeMap<NaiveDate, PeriodSales> = BTreeMap::new();
    for trx in transactions.iter().filter(|t| start <= t.timestamp && t.timestamp <= end) {
        let period_start = period.bucket_start(trx.timestamp.date());
        let bucket = buckets.entry(period_start).or_insert_with(|| PeriodSales {
            period_start,
            revenue: Decimal::ZERO,
            transaction_count: 0,
        });
        bucket.revenue = bucket.revenue.saturating_add(trx.total_price);
        bucket.transaction_count += 1;
    }
    buckets.into_values().collect()
}

/// Stock totals per category, sorted by category name.
pub fn stock_by_category(products: &[Product], threshold: u32) -> Vec<CategoryStock> {
    let mut categories: BTreeMap<&str, CategoryStock> = BTreeMap::new();
    for product in products {
        let entry = categories
            .entry(product.category.as_str())
            .or_insert_with(|| CategoryStock {
                category: product.category.clone(),
                product_count: 0,
                total_stock: 0,
                low_stock_count: 0,
                out_of_stock_count: 0,
                stock_value: Decimal::ZERO,
            });
        entry.product_count += 1;
        entry.total_stock += u64::from(product.stock);
        let value = product.price.saturating_mul(Decimal::from(product.stock));
        entry.stock_value = entry.stock_value.saturating_add(value);
        if product.stock <= threshold {
            entry.low_stock_count += 1;
        }
        if product.stock == 0 {
            entry.out_of_stock_count += 1;
        }
    }
    categories.into_values().collect()
}

/// Headline figures for `today`. Revenue counts only `Selesai` orders placed today.
pub fn dashboard(
    products: &[Product],
    orders: &[Order],
    today: NaiveDate,
    threshold: u32,
) -> Dashboard {
    let todays: Vec<&Order> = orders.iter().filter(|o| o.created_at.date() == today).collect();
    Dashboard {
        product_count: products.len(),
        low_stock_count: products.iter().filter(|p| p.stock <= threshold).count(),
        orders_today: todays.len(),
        revenue_today: saturating_sum(
            todays
                .iter()
                .filter(|o| o.status == OrderStatus::Selesai)
                .map(|o| o.total_price),
        ),
    }
}

/// Sum that clamps at `Decimal::MAX` instead of panicking.
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        format!("{}T10:00:00", date).parse().unwrap()
    }

    fn product(id: &str, category: &str, price: i64, stock: u32) -> Product {
        Product {
            id: id.into(),
            name: format!("Produk {}", id),
            category: category.into(),
            price: Decimal::from(price),
            stock,
            description: String::new(),
            created_at: at("2024-01-01"),
            updated_at: at("2024-01-01"),
        }
    }

    fn order(id: &str, product_id: &str, quantity: u32, status: OrderStatus, date: &str) -> Order {
        let mut order =
            Order::pending(id, "C1", product_id, quantity, Decimal::from(1_000), at(date)).unwrap();
        order.status = status;
        order
    }

    fn transaction(id: &str, order_id: &str, total: i64, date: &str) -> Transaction {
        Transaction {
            id: id.into(),
            order_id: order_id.into(),
            total_price: Decimal::from(total),
            payment_method: "Tunai".into(),
            timestamp: at(date),
        }
    }

    #[test]
    fn test_sales_report_filters_and_joins() {
        let products = vec![product("PRD1", "Sembako", 1_000, 5)];
        let orders = vec![order("ORD1", "PRD1", 3, OrderStatus::Selesai, "2024-03-01")];
        let transactions = vec![
            transaction("TRX1", "ORD1", 3_000, "2024-03-01"),
            transaction("TRX2", "ORD_GONE", 1_000, "2024-03-02"),
            transaction("TRX3", "ORD1", 9_999, "2024-04-15"),
        ];

        let (start, end) = (at("2024-03-01"), at("2024-03-31"));
        let report = sales_report(&transactions, &orders, &products, start, end);

        assert_eq!(report.transaction_count, 2);
        assert_eq!(report.total_revenue, Decimal::from(4_000));
        assert_eq!(report.average_sale, Decimal::from(2_000));
        assert_eq!(report.lines[0].product_name, "Produk PRD1");
        assert_eq!(report.lines[0].quantity, 3);
        assert_eq!(report.lines[1].customer_id, MISSING);
        assert_eq!(report.lines[1].product_name, MISSING);
        assert_eq!(report.lines[1].quantity, 1);
    }

    #[test]
    fn test_sales_report_bounds_are_inclusive() {
        let transactions = vec![transaction("TRX1", "ORD1", 500, "2024-03-01")];
        let stamp = at("2024-03-01");

        let report = sales_report(&transactions, &[], &[], stamp, stamp);

        assert_eq!(report.transaction_count, 1);
    }

    #[test]
    fn test_empty_sales_report_averages_zero() {
        let report = sales_report(&[], &[], &[], at("2024-01-01"), at("2024-12-31"));
        assert_eq!(report.average_sale, Decimal::ZERO);
        assert!(report.lines.is_empty());
    }

    #[test]
    fn test_top_products_counts_every_status() {
        let products = vec![product("PRD1", "A", 1, 1), product("PRD2", "A", 1, 1)];
        let orders = vec![
            order("ORD1", "PRD1", 2, OrderStatus::Selesai, "2024-03-01"),
            order("ORD2", "PRD1", 2, OrderStatus::Pending, "2024-03-01"),
            order("ORD3", "PRD2", 3, OrderStatus::Selesai, "2024-03-01"),
            order("ORD4", "PRD2", 9, OrderStatus::Dibatalkan, "2024-03-01"),
            order("ORD5", "PRD9", 1, OrderStatus::Pending, "2024-03-01"),
        ];

        let top = top_products(&orders, &products, 2);

        assert_eq!(top.len(), 2);
        assert_eq!((top[0].product_id.as_str(), top[0].quantity), ("PRD2", 12));
        assert_eq!((top[1].product_id.as_str(), top[1].quantity), ("PRD1", 4));
        assert_eq!(top_products(&orders, &products, 5)[2].product_name, MISSING);
    }

    #[test]
    fn test_low_stock_includes_threshold() {
        let products = vec![
            product("PRD1", "A", 1, 10),
            product("PRD2", "A", 1, 11),
            product("PRD3", "A", 1, 0),
        ];

        let ids: Vec<String> = low_stock(&products, 10).into_iter().map(|p| p.id).collect();

        assert_eq!(ids, vec!["PRD1", "PRD3"]);
    }

    #[test]
    fn test_weekly_buckets_start_on_monday() {
        // 2024-03-04 is a Monday.
        let transactions = vec![
            transaction("TRX1", "O", 100, "2024-03-04"),
            transaction("TRX2", "O", 200, "2024-03-10"),
            transaction("TRX3", "O", 400, "2024-03-11"),
        ];

        let (start, end) = (at("2024-01-01"), at("2024-12-31"));
        let weeks = sales_by_period(&transactions, start, end, Period::Weekly);

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].period_start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(weeks[0].revenue, Decimal::from(300));
        assert_eq!(weeks[0].transaction_count, 2);
        assert_eq!(weeks[1].period_start, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn test_monthly_and_yearly_buckets() {
        let transactions = vec![
            transaction("TRX1", "O", 100, "2023-12-31"),
            transaction("TRX2", "O", 200, "2024-01-15"),
            transaction("TRX3", "O", 400, "2024-01-20"),
        ];
        let (start, end) = (at("2023-01-01"), at("2024-12-31"));

        let months = sales_by_period(&transactions, start, end, Period::Monthly);
        assert_eq!(months.len(), 2);
        assert_eq!(months[1].period_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(months[1].revenue, Decimal::from(600));

        let years = sales_by_period(&transactions, start, end, Period::Yearly);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].period_start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn test_stock_by_category() {
        let products = vec![
            product("PRD1", "Sembako", 1_000, 0),
            product("PRD2", "Sembako", 2_000, 20),
            product("PRD3", "Minuman", 500, 4),
        ];

        let categories = stock_by_category(&products, 10);

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Minuman");
        let sembako = &categories[1];
        assert_eq!(sembako.product_count, 2);
        assert_eq!(sembako.total_stock, 20);
        assert_eq!(sembako.low_stock_count, 1);
        assert_eq!(sembako.out_of_stock_count, 1);
        assert_eq!(sembako.stock_value, Decimal::from(40_000));
    }

    #[test]
    fn test_dashboard_counts_today_only() {
        let products = vec![product("PRD1", "A", 1, 3), product("PRD2", "A", 1, 50)];
        let orders = vec![
            order("ORD1", "PRD1", 2, OrderStatus::Selesai, "2024-03-01"),
            order("ORD2", "PRD1", 1, OrderStatus::Pending, "2024-03-01"),
            order("ORD3", "PRD1", 5, OrderStatus::Selesai, "2024-02-29"),
        ];

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let summary = dashboard(&products, &orders, today, 10);

        assert_eq!(
            summary,
            Dashboard {
                product_count: 2,
                low_stock_count: 1,
                orders_today: 2,
                revenue_today: Decimal::from(2_000),
            }
        );
    }

    #[test]
    fn test_huge_totals_saturate() {
        let mut expensive = product("PRD1", "Sembako", 1, 3);
        expensive.price = Decimal::MAX;
        let transactions = vec![
            Transaction { total_price: Decimal::MAX, ..transaction("TRX1", "O", 0, "2024-03-01") },
            Transaction { total_price: Decimal::MAX, ..transaction("TRX2", "O", 0, "2024-03-01") },
        ];
        let (start, end) = (at("2024-01-01"), at("2024-12-31"));

        let report = sales_report(&transactions, &[], &[], start, end);
        assert_eq!(report.total_revenue, Decimal::MAX);

        let days = sales_by_period(&transactions, start, end, Period::Daily);
        assert_eq!(days[0].revenue, Decimal::MAX);

        assert_eq!(stock_by_category(&[expensive], 10)[0].stock_value, Decimal::MAX);
    }
}
