use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::invoice::{
  AmountInCents, Invoice, InvoiceFields, InvoiceStatus, InvoiceSummary, NewInvoice,
  errors::InvoiceError, ports::InvoiceRepository,
};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  customer_id: String,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let status = InvoiceStatus::from_str(&row.status)?;

    Ok(Invoice {
      id: row.id,
      customer_id: row.customer_id,
      amount: AmountInCents::from_cents(row.amount),
      status,
      date: row.date,
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceSummaryRow {
  id: Uuid,
  customer_id: String,
  customer_name: Option<String>,
  customer_email: Option<String>,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceSummaryRow> for InvoiceSummary {
  type Error = InvoiceError;

  fn try_from(row: InvoiceSummaryRow) -> Result<Self, Self::Error> {
    let status = InvoiceStatus::from_str(&row.status)?;

    Ok(InvoiceSummary {
      id: row.id,
      customer_id: row.customer_id,
      customer_name: row.customer_name,
      customer_email: row.customer_email,
      amount: AmountInCents::from_cents(row.amount),
      status,
      date: row.date,
    })
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

// customer_id arrives as free text from the form; the ::uuid cast makes a
// malformed value fail inside Postgres like any other storage error.
#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            RETURNING id, customer_id::text AS customer_id, amount, status, date
            "#,
    )
    .bind(&invoice.customer_id)
    .bind(invoice.amount.value())
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
            UPDATE invoices
            SET customer_id = $2::uuid, amount = $3, status = $4
            WHERE id = $1
            "#,
    )
    .bind(id)
    .bind(&fields.customer_id)
    .bind(fields.amount.value())
    .bind(fields.status.as_str())
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }

  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
      DELETE FROM invoices
      WHERE id = $1
      "#,
    )
    .bind(id)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_all(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceSummaryRow>(
      r#"
            SELECT invoices.id, invoices.customer_id::text AS customer_id,
                   customers.name AS customer_name, customers.email AS customer_email,
                   invoices.amount, invoices.status, invoices.date
            FROM invoices
            LEFT JOIN customers ON customers.id = invoices.customer_id
            ORDER BY invoices.date DESC, invoices.id
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
