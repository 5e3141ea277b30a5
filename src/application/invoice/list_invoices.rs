use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: Uuid,
  pub customer_id: String,
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
  pub amount_cents: i64,
  pub amount: String,
  pub status: String,
  pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self.invoice_service.list_invoices().await?;

    let invoice_dtos = invoices
      .into_iter()
      .map(|i| InvoiceListItemDto {
        id: i.id,
        customer_id: i.customer_id,
        customer_name: i.customer_name,
        customer_email: i.customer_email,
        amount_cents: i.amount.value(),
        amount: i.amount.to_string(),
        status: i.status.as_str().to_string(),
        date: i.date,
      })
      .collect();

    Ok(ListInvoicesResponse {
      invoices: invoice_dtos,
    })
  }
}
