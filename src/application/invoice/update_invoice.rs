use std::sync::Arc;
use uuid::Uuid;

use super::form::{FormState, InvoiceForm};
use super::{INVOICES_PATH, InvoiceAction};
use crate::domain::invoice::InvoiceService;

pub const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_DATABASE_ERROR: &str = "Database Error: Failed to Update Invoice.";

#[derive(Debug, Clone)]
pub struct UpdateInvoiceCommand {
  pub invoice_id: Uuid,
  pub previous_state: FormState,
  pub form: InvoiceForm,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Rewrites customer, amount and status of one invoice.
  ///
  /// An id that matches no row still counts as success.
  pub async fn execute(&self, command: UpdateInvoiceCommand) -> InvoiceAction {
    if command.previous_state.has_errors() {
      tracing::debug!(invoice_id = %command.invoice_id, "Resubmitting edit form after validation errors");
    }

    let fields = match command.form.parse() {
      Ok(fields) => fields,
      Err(errors) => {
        tracing::debug!(invoice_id = %command.invoice_id, ?errors, "Invoice form rejected");
        return InvoiceAction::Invalid(FormState::invalid(errors, UPDATE_MISSING_FIELDS));
      }
    };

    match self
      .invoice_service
      .update_invoice(command.invoice_id, fields)
      .await
    {
      Ok(rows) => {
        tracing::info!(invoice_id = %command.invoice_id, rows, "Invoice updated");
      }
      Err(e) => {
        tracing::error!(invoice_id = %command.invoice_id, error = %e, "Failed to update invoice");
        return InvoiceAction::Failed(FormState::with_message(UPDATE_DATABASE_ERROR));
      }
    }

    self.invoice_service.revalidate_path(INVOICES_PATH).await;
    InvoiceAction::redirect_to_invoices()
  }
}
