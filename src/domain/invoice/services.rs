use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Customer, Invoice, InvoiceFields, InvoiceSummary, NewInvoice};
use super::errors::InvoiceError;
use super::ports::{CustomerRepository, InvoiceRepository, PageCache};

pub struct InvoiceServiceDependencies {
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub customer_repo: Arc<dyn CustomerRepository>,
  pub page_cache: Arc<dyn PageCache>,
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  customer_repo: Arc<dyn CustomerRepository>,
  page_cache: Arc<dyn PageCache>,
}

impl InvoiceService {
  pub fn new(deps: InvoiceServiceDependencies) -> Self {
    Self {
      invoice_repo: deps.invoice_repo,
      customer_repo: deps.customer_repo,
      page_cache: deps.page_cache,
    }
  }

  // Invoice operations
  pub async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    self.invoice_repo.create(invoice).await
  }

  /// Updates customer, amount and status. A missing `id` is not an error:
  /// the update simply affects no rows.
  pub async fn update_invoice(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError> {
    let rows = self.invoice_repo.update(id, fields).await?;
    if rows == 0 {
      tracing::debug!(invoice_id = %id, "Update matched no invoice");
    }
    Ok(rows)
  }

  pub async fn delete_invoice(&self, id: Uuid) -> Result<u64, InvoiceError> {
    let rows = self.invoice_repo.delete(id).await?;
    if rows == 0 {
      tracing::debug!(invoice_id = %id, "Delete matched no invoice");
    }
    Ok(rows)
  }

  pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(id))
  }

  pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    self.invoice_repo.find_all().await
  }

  // Customer operations
  pub async fn list_customers(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.customer_repo.find_all().await
  }

  /// Invalidates the cached copy of `path`.
  ///
  /// Runs after a committed mutation, so a cache failure is only logged:
  /// the entry still expires on its own TTL.
  pub async fn revalidate_path(&self, path: &str) {
    if let Err(e) = self.page_cache.invalidate(path).await {
      tracing::warn!(path, error = %e, "Failed to invalidate cached page");
    }
  }
}
