use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::form::FormState;
use super::{INVOICES_PATH, InvoiceAction};
use crate::domain::invoice::InvoiceService;

pub const DELETED_MESSAGE: &str = "Deleted Invoice.";
pub const DELETE_DATABASE_ERROR: &str = "Database Error: Failed to Delete Invoice.";

#[derive(Debug, Deserialize)]
pub struct DeleteInvoiceCommand {
  pub invoice_id: Uuid,
}

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Deletes one invoice. Deleting an id that does not exist succeeds too.
  pub async fn execute(&self, command: DeleteInvoiceCommand) -> InvoiceAction {
    match self.invoice_service.delete_invoice(command.invoice_id).await {
      Ok(rows) => {
        tracing::info!(invoice_id = %command.invoice_id, rows, "Invoice deleted");
      }
      Err(e) => {
        tracing::error!(invoice_id = %command.invoice_id, error = %e, "Failed to delete invoice");
        return InvoiceAction::Failed(FormState::with_message(DELETE_DATABASE_ERROR));
      }
    }

    self.invoice_service.revalidate_path(INVOICES_PATH).await;
    InvoiceAction::Completed(FormState::with_message(DELETED_MESSAGE))
  }
}
