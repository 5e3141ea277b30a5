use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{AmountInCents, InvoiceStatus};

/// Validated, user-editable invoice fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFields {
  pub customer_id: String,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
}

/// Invoice about to be inserted; the id is assigned by storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
  pub customer_id: String,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl NewInvoice {
  pub fn new(fields: InvoiceFields, date: NaiveDate) -> Self {
    Self {
      customer_id: fields.customer_id,
      amount: fields.amount,
      status: fields.status,
      date,
    }
  }
}

// Invoice - `id` and `date` never change after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub customer_id: String,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl Invoice {
  pub fn apply(&mut self, fields: InvoiceFields) {
    self.customer_id = fields.customer_id;
    self.amount = fields.amount;
    self.status = fields.status;
  }
}

/// Invoice row joined with its customer for the list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
  pub id: Uuid,
  pub customer_id: String,
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub id: Uuid,
  pub name: String,
  pub email: String,
}
