use tracing::{debug, instrument};

use crate::framework::ResourceClient;
use crate::ledger_actor::LedgerError;
use crate::model::{Transaction, TransactionCreate};

/// Client for the transaction ledger. Entries can be recorded and read, never changed.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<Transaction>,
}

impl_basic_client!(LedgerClient, Transaction, LedgerError, transaction);

impl LedgerClient {
    #[instrument(skip(self))]
    pub async fn record_transaction(
        &self,
        params: TransactionCreate,
    ) -> Result<Transaction, LedgerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(LedgerError::from)
    }
}
