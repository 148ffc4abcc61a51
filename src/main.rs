use chrono::{Days, Local};
use rust_decimal::Decimal;
use tracing::{error, info, info_span, Instrument};

use retail_store::model::{OrderCreate, ProductCreate};
use retail_store::order_service::OrderError;
use retail_store::reports::Period;
use retail_store::{setup_tracing, AppConfig, AppError, RetailSystem};

const REPORT_DAYS: u64 = 30;
const TOP_PRODUCTS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_tracing();

    let config = AppConfig::from_env()?;
    let run_demo = std::env::args().nth(1).as_deref() == Some("demo");

    let system = RetailSystem::start(config)?;

    if run_demo {
        let result = demo(&system).instrument(info_span!("demo")).await;
        if let Err(e) = &result {
            error!(error = %e, "Demo failed");
        }
        result?;
    }

    print_reports(&system)?;

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}

/// Seeds one product and walks an order through every transition.
async fn demo(system: &RetailSystem) -> Result<(), AppError> {
    let product = system
        .product_client
        .create_product(ProductCreate::new("Beras 5kg", "Sembako", Decimal::from(100_000), 5))
        .await?;
    info!(product_id = %product.id, stock = product.stock, "Product created");

    let orders = &system.order_client;
    match orders.create_order(OrderCreate::new("PLG001", product.id.clone(), 6)).await {
        Err(OrderError::InsufficientStock { requested, available }) => {
            info!(requested, available, "Oversized order rejected")
        }
        other => error!(result = ?other, "Oversized order was not rejected"),
    }

    let order = orders.create_order(OrderCreate::new("PLG001", product.id.clone(), 3)).await?;
    info!(order_id = %order.id, total = %order.total_price, "Order created");

    let cancelled = orders.cancel_order(order.id.clone()).await?;
    info!(order_id = %cancelled.id, status = %cancelled.status, "Order cancelled");

    let order = orders.create_order(OrderCreate::new("PLG002", product.id.clone(), 2)).await?;
    let transaction = orders.complete_order(order.id.clone(), None).await?;
    info!(
        transaction_id = %transaction.id,
        total = %transaction.total_price,
        payment_method = %transaction.payment_method,
        "Order completed"
    );

    let stock = system.product_client.check_stock(product.id.clone()).await?;
    info!(stock, "Final stock");

    for notification in system.notifier_client.list_notifications().await? {
        info!(level = ?notification.level, "{}", notification.message);
    }
    Ok(())
}

fn print_reports(system: &RetailSystem) -> Result<(), AppError> {
    let reporter = &system.reporter;
    let now = Local::now().naive_local();
    let start = now - Days::new(REPORT_DAYS);

    let dashboard = reporter.dashboard(now.date())?;
    println!("== Dashboard ({}) ==", now.date());
    println!("Products:        {}", dashboard.product_count);
    println!("Low stock:       {}", dashboard.low_stock_count);
    println!("Orders today:    {}", dashboard.orders_today);
    println!("Revenue today:   {}", dashboard.revenue_today);

    println!();
    println!("== Low stock (<= {}) ==", system.config.low_stock_threshold);
    for product in reporter.low_stock(system.config.low_stock_threshold)? {
        println!("{:<20} {:<30} {:>6}", product.id, product.name, product.stock);
    }

    println!();
    println!("== Top {} products ==", TOP_PRODUCTS);
    for entry in reporter.top_products(TOP_PRODUCTS)? {
        println!("{:<20} {:<30} {:>6}", entry.product_id, entry.product_name, entry.quantity);
    }

    println!();
    println!("== Stock by category ==");
    for category in reporter.stock_by_category()? {
        println!(
            "{:<20} products {:>4}  stock {:>6}  low {:>3}  empty {:>3}  value {}",
            category.category,
            category.product_count,
            category.total_stock,
            category.low_stock_count,
            category.out_of_stock_count,
            category.stock_value
        );
    }

    let report = reporter.sales_report(start, now)?;
    println!();
    println!("== Sales, last {} days ==", REPORT_DAYS);
    for line in &report.lines {
        println!(
            "{}  {:<22} {:<10} {:<30} {:>4} {:>12} {}",
            line.timestamp.format("%d/%m/%Y %H:%M"),
            line.transaction_id,
            line.customer_id,
            line.product_name,
            line.quantity,
            line.total_price,
            line.payment_method
        );
    }
    println!(
        "{} transactions, total {}, average {}",
        report.transaction_count,
        report.total_revenue,
        report.average_sale.round_dp(2)
    );

    println!();
    println!("== Weekly sales ==");
    for week in reporter.sales_by_period(start, now, Period::Weekly)? {
        println!(
            "{}  {:>4} transactions  {}",
            week.period_start, week.transaction_count, week.revenue
        );
    }
    Ok(())
}
