//! In-memory collaborators for exercising use cases and handlers without
//! Postgres or Redis.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::domain::invoice::{
  CacheError, Customer, CustomerRepository, Invoice, InvoiceError, InvoiceFields,
  InvoiceRepository, InvoiceService, InvoiceServiceDependencies, InvoiceSummary, NewInvoice,
  PageCache, PageLookup,
};
use crate::infrastructure::cache::InMemoryPageCache;

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
  invoices: Mutex<HashMap<Uuid, Invoice>>,
  customers: Mutex<Vec<Customer>>,
}

impl InMemoryInvoiceRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, invoice: Invoice) {
    self.invoices.lock().unwrap().insert(invoice.id, invoice);
  }

  pub fn add_customer(&self, customer: Customer) {
    self.customers.lock().unwrap().push(customer);
  }

  pub fn get(&self, id: Uuid) -> Option<Invoice> {
    self.invoices.lock().unwrap().get(&id).cloned()
  }

  pub fn all(&self) -> Vec<Invoice> {
    self.invoices.lock().unwrap().values().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.invoices.lock().unwrap().len()
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    let invoice = Invoice {
      id: Uuid::new_v4(),
      customer_id: invoice.customer_id,
      amount: invoice.amount,
      status: invoice.status,
      date: invoice.date,
    };
    self.insert(invoice.clone());
    Ok(invoice)
  }

  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError> {
    let mut invoices = self.invoices.lock().unwrap();
    match invoices.get_mut(&id) {
      Some(invoice) => {
        invoice.apply(fields);
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError> {
    Ok(self.invoices.lock().unwrap().remove(&id).map_or(0, |_| 1))
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    Ok(self.get(id))
  }

  async fn find_all(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let customers = self.customers.lock().unwrap().clone();
    let mut summaries: Vec<InvoiceSummary> = self
      .all()
      .into_iter()
      .map(|invoice| {
        let customer = customers
          .iter()
          .find(|c| c.id.to_string() == invoice.customer_id);
        InvoiceSummary {
          id: invoice.id,
          customer_id: invoice.customer_id.clone(),
          customer_name: customer.map(|c| c.name.clone()),
          customer_email: customer.map(|c| c.email.clone()),
          amount: invoice.amount,
          status: invoice.status,
          date: invoice.date,
        }
      })
      .collect();
    // Same order as the Postgres query: date DESC, id
    summaries.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
    Ok(summaries)
  }
}

#[async_trait]
impl CustomerRepository for InMemoryInvoiceRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    Ok(self.customers.lock().unwrap().clone())
  }
}

/// Repository whose every statement fails like a dropped connection
pub struct FailingInvoiceRepository;

#[async_trait]
impl InvoiceRepository for FailingInvoiceRepository {
  async fn create(&self, _invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    Err(InvoiceError::Database(sqlx::Error::PoolTimedOut))
  }

  async fn update(&self, _id: Uuid, _fields: InvoiceFields) -> Result<u64, InvoiceError> {
    Err(InvoiceError::Database(sqlx::Error::PoolTimedOut))
  }

  async fn delete(&self, _id: Uuid) -> Result<u64, InvoiceError> {
    Err(InvoiceError::Database(sqlx::Error::PoolTimedOut))
  }

  async fn find_by_id(&self, _id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    Err(InvoiceError::Database(sqlx::Error::PoolTimedOut))
  }

  async fn find_all(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    Err(InvoiceError::Database(sqlx::Error::PoolTimedOut))
  }
}

#[async_trait]
impl CustomerRepository for FailingInvoiceRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    Err(InvoiceError::Database(sqlx::Error::PoolTimedOut))
  }
}

/// Repository whose `find_all` stops after reading its rows until released,
/// so a mutation can commit while a list render is in flight
pub struct PausingInvoiceRepository {
  inner: Arc<InMemoryInvoiceRepository>,
  snapshot_taken: Notify,
  release: Notify,
}

impl PausingInvoiceRepository {
  pub fn new(inner: Arc<InMemoryInvoiceRepository>) -> Self {
    Self {
      inner,
      snapshot_taken: Notify::new(),
      release: Notify::new(),
    }
  }

  pub async fn wait_for_snapshot(&self) {
    self.snapshot_taken.notified().await;
  }

  pub fn release(&self) {
    self.release.notify_one();
  }
}

#[async_trait]
impl InvoiceRepository for PausingInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    self.inner.create(invoice).await
  }

  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError> {
    self.inner.update(id, fields).await
  }

  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError> {
    self.inner.delete(id).await
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    self.inner.find_by_id(id).await
  }

  async fn find_all(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let rows = InvoiceRepository::find_all(self.inner.as_ref()).await?;
    self.snapshot_taken.notify_one();
    self.release.notified().await;
    Ok(rows)
  }
}

/// In-memory page cache that also records every invalidated path
pub struct RecordingPageCache {
  pages: InMemoryPageCache,
  invalidated: Mutex<Vec<String>>,
}

impl Default for RecordingPageCache {
  fn default() -> Self {
    Self {
      pages: InMemoryPageCache::new(Duration::from_secs(3600)),
      invalidated: Mutex::new(Vec::new()),
    }
  }
}

impl RecordingPageCache {
  pub fn invalidated(&self) -> Vec<String> {
    self.invalidated.lock().unwrap().clone()
  }
}

#[async_trait]
impl PageCache for RecordingPageCache {
  async fn get(&self, path: &str) -> Result<PageLookup, CacheError> {
    self.pages.get(path).await
  }

  async fn put(&self, path: &str, body: &str, generation: u64) -> Result<bool, CacheError> {
    self.pages.put(path, body, generation).await
  }

  async fn invalidate(&self, path: &str) -> Result<(), CacheError> {
    self.invalidated.lock().unwrap().push(path.to_string());
    self.pages.invalidate(path).await
  }
}

pub struct TestContext {
  pub repo: Arc<InMemoryInvoiceRepository>,
  pub cache: Arc<RecordingPageCache>,
  pub service: Arc<InvoiceService>,
}

pub fn in_memory_service() -> TestContext {
  let repo = Arc::new(InMemoryInvoiceRepository::new());
  let cache = Arc::new(RecordingPageCache::default());
  let service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo: repo.clone(),
    customer_repo: repo.clone(),
    page_cache: cache.clone(),
  }));

  TestContext {
    repo,
    cache,
    service,
  }
}

pub fn failing_service() -> (Arc<InvoiceService>, Arc<RecordingPageCache>) {
  let repo = Arc::new(FailingInvoiceRepository);
  let cache = Arc::new(RecordingPageCache::default());
  let service = Arc::new(InvoiceService::new(InvoiceServiceDependencies {
    invoice_repo: repo.clone(),
    customer_repo: repo,
    page_cache: cache.clone(),
  }));

  (service, cache)
}
