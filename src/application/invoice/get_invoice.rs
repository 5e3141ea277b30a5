use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::form::InvoiceForm;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct GetInvoiceCommand {
  pub invoice_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GetInvoiceResponse {
  pub id: Uuid,
  pub date: NaiveDate,
  /// Stored values rendered back as raw form fields for the edit page
  pub form: InvoiceForm,
}

pub struct GetInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: GetInvoiceCommand) -> Result<GetInvoiceResponse, InvoiceError> {
    let invoice = self.invoice_service.get_invoice(command.invoice_id).await?;

    Ok(GetInvoiceResponse {
      id: invoice.id,
      date: invoice.date,
      form: InvoiceForm {
        customer_id: invoice.customer_id,
        amount: invoice.amount.to_decimal().to_string(),
        status: invoice.status.as_str().to_string(),
      },
    })
  }
}
