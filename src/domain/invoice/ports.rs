use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Customer, Invoice, InvoiceFields, InvoiceSummary, NewInvoice};
use super::errors::{CacheError, InvoiceError};

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError>;
  /// Returns the number of rows changed; zero when `id` does not exist.
  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError>;
  /// Returns the number of rows removed; zero when `id` does not exist.
  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  async fn find_all(&self) -> Result<Vec<InvoiceSummary>, InvoiceError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError>;
}

/// Cached copy of a path together with the path's current generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLookup {
  pub body: Option<String>,
  /// Bumped by every invalidation of the path
  pub generation: u64,
}

/// Rendered-page cache keyed by request path
///
/// A page rendered after a miss is stored with the generation seen by that
/// miss. If the path was invalidated in between, the store is refused.
#[async_trait]
pub trait PageCache: Send + Sync {
  async fn get(&self, path: &str) -> Result<PageLookup, CacheError>;
  /// Returns `false` without storing when `generation` is no longer current
  async fn put(&self, path: &str, body: &str, generation: u64) -> Result<bool, CacheError>;
  /// Drops the cached copy and bumps the generation, so the next read
  /// renders fresh data and renders already in flight are not stored
  async fn invalidate(&self, path: &str) -> Result<(), CacheError>;
}
