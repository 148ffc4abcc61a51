use super::error::LedgerError;
use crate::framework::Entity;
use crate::model::{now, Transaction, TransactionCreate};

/// Transactions are append-only: updates and deletes are refused by the hooks.
impl Entity for Transaction {
    type Id = String;
    type CreateParams = TransactionCreate;
    type UpdateParams = ();
    type Action = ();
    type ActionResult = ();
    type Error = LedgerError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: TransactionCreate) -> Result<Self, LedgerError> {
        if params.order_id.trim().is_empty() {
            return Err(LedgerError::ValidationError("missing required field: order_id".into()));
        }
        if params.payment_method.trim().is_empty() {
            return Err(LedgerError::ValidationError(
                "missing required field: payment_method".into(),
            ));
        }
        Ok(Self {
            id,
            order_id: params.order_id,
            total_price: params.total_price,
            payment_method: params.payment_method,
            timestamp: now(),
        })
    }

    fn on_update(&mut self, _params: ()) -> Result<(), LedgerError> {
        Err(LedgerError::Immutable(self.id.clone()))
    }

    fn on_delete(&self) -> Result<(), LedgerError> {
        Err(LedgerError::Immutable(self.id.clone()))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), LedgerError> {
        Ok(())
    }

    fn is_read_only(_action: &()) -> bool {
        true
    }
}
