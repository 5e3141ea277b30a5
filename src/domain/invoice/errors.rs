use super::value_objects::ValueObjectError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("Redis error: {0}")]
  Redis(#[from] redis::RedisError),

  #[error("Cache backend error: {0}")]
  Backend(String),
}
