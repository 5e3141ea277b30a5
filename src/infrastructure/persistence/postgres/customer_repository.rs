use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{Customer, errors::InvoiceError, ports::CustomerRepository};

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: Uuid,
  name: String,
  email: String,
}

impl From<CustomerRow> for Customer {
  fn from(row: CustomerRow) -> Self {
    Customer {
      id: row.id,
      name: row.name,
      email: row.email,
    }
  }
}

/// Read-only access to customers for the invoice form dropdown
pub struct PostgresCustomerRepository {
  pool: PgPool,
}

impl PostgresCustomerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, email
            FROM customers
            ORDER BY name ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Customer::from).collect())
  }
}
