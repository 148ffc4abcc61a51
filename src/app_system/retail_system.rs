use std::fs;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::clients::{LedgerClient, NotifierClient, OrderClient, ProductClient};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{Order, Product, Transaction};
use crate::notifier::StockNotifier;
use crate::order_service::OrderService;
use crate::reports::Reporter;
use crate::store::{RecordStore, StoreError};
use crate::{ledger_actor, product_actor};

const EVENT_BUFFER: usize = 64;

/// The running retail system: every actor started and wired together.
///
/// Startup order:
/// 1. product and ledger actors (no dependencies)
/// 2. order service, given their clients
/// 3. stock notifier, subscribed to product events
pub struct RetailSystem {
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub ledger_client: LedgerClient,
    pub notifier_client: NotifierClient,
    pub reporter: Reporter,
    pub config: AppConfig,
    handles: Vec<JoinHandle<()>>,
}

impl RetailSystem {
    /// Creates the data directory and any missing entity-set files, then spawns the
    /// actors. Must be called inside a tokio runtime.
    #[instrument(
        name = "retail_system",
        fields(data_dir = %config.data_dir.display()),
        skip(config)
    )]
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        info!("Starting retail system");

        fs::create_dir_all(&config.data_dir).map_err(StoreError::from)?;
        let products = RecordStore::<Product>::open(&config.data_dir);
        let orders = RecordStore::<Order>::open(&config.data_dir);
        let transactions = RecordStore::<Transaction>::open(&config.data_dir);
        products.ensure_file()?;
        orders.ensure_file()?;
        transactions.ensure_file()?;

        let mut handles = Vec::new();
        let (events, product_events) = broadcast::channel(EVENT_BUFFER);

        let (product_actor, product_client) =
            product_actor::new(config.actor_buffer, products, events);
        handles.push(tokio::spawn(product_actor.run()));

        let (ledger_actor, ledger_client) = ledger_actor::new(config.actor_buffer, transactions);
        handles.push(tokio::spawn(ledger_actor.run()));

        let (order_service, order_client) = OrderService::new(
            config.actor_buffer,
            orders,
            product_client.clone(),
            ledger_client.clone(),
            config.default_payment_method.clone(),
        );
        handles.push(tokio::spawn(order_service.run()));

        let (notifier, notifier_client) =
            StockNotifier::new(config.actor_buffer, product_events, config.low_stock_threshold);
        handles.push(tokio::spawn(notifier.run()));

        info!("Retail system started");

        Ok(Self {
            product_client,
            order_client,
            ledger_client,
            notifier_client,
            reporter: Reporter::open(&config.data_dir, config.low_stock_threshold),
            config,
            handles,
        })
    }

    /// Stops the root actors first, then the resource actors once their last client
    /// is gone, and waits for every task.
    ///
    /// Resource actors stop when all clients are dropped, so clones handed out by the
    /// caller must be dropped before this returns.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), AppError> {
        info!("Shutting down retail system");

        let _ = self.order_client.shutdown().await;
        let _ = self.notifier_client.shutdown().await;
        drop(self.product_client);
        drop(self.ledger_client);

        let mut failure = None;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                failure.get_or_insert_with(|| e.to_string());
            }
        }

        match failure {
            Some(reason) => Err(AppError::Shutdown(reason)),
            None => {
                info!("Retail system shutdown complete");
                Ok(())
            }
        }
    }
}
