use chrono::Utc;
use std::sync::Arc;

use super::form::{FormState, InvoiceForm};
use super::{INVOICES_PATH, InvoiceAction};
use crate::domain::invoice::{InvoiceService, NewInvoice};

pub const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub const CREATE_DATABASE_ERROR: &str = "Database Error: Failed to Create Invoice.";

#[derive(Debug, Clone, Default)]
pub struct CreateInvoiceCommand {
  /// State returned by the previous submission of this form
  pub previous_state: FormState,
  pub form: InvoiceForm,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: CreateInvoiceCommand) -> InvoiceAction {
    if command.previous_state.has_errors() {
      tracing::debug!("Resubmitting invoice form after validation errors");
    }

    let fields = match command.form.parse() {
      Ok(fields) => fields,
      Err(errors) => {
        tracing::debug!(?errors, "Invoice form rejected");
        return InvoiceAction::Invalid(FormState::invalid(errors, CREATE_MISSING_FIELDS));
      }
    };

    let date = Utc::now().date_naive();

    match self
      .invoice_service
      .create_invoice(NewInvoice::new(fields, date))
      .await
    {
      Ok(invoice) => {
        tracing::info!(
          invoice_id = %invoice.id,
          amount_cents = invoice.amount.value(),
          status = invoice.status.as_str(),
          "Invoice created"
        );
      }
      Err(e) => {
        tracing::error!(error = %e, "Failed to create invoice");
        return InvoiceAction::Failed(FormState::with_message(CREATE_DATABASE_ERROR));
      }
    }

    self.invoice_service.revalidate_path(INVOICES_PATH).await;
    InvoiceAction::redirect_to_invoices()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::form::AMOUNT_GREATER_THAN_ZERO;
  use crate::application::invoice::test_support::{failing_service, in_memory_service};
  use crate::domain::invoice::InvoiceStatus;

  fn command(customer_id: &str, amount: &str, status: &str) -> CreateInvoiceCommand {
    CreateInvoiceCommand {
      previous_state: FormState::default(),
      form: InvoiceForm {
        customer_id: customer_id.to_string(),
        amount: amount.to_string(),
        status: status.to_string(),
      },
    }
  }

  #[tokio::test]
  async fn test_create_stores_cents_and_today() {
    let ctx = in_memory_service();
    let use_case = CreateInvoiceUseCase::new(ctx.service.clone());

    let action = use_case.execute(command("c1", "45.5", "pending")).await;

    assert_eq!(action, InvoiceAction::redirect_to_invoices());
    let stored = ctx.repo.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].customer_id, "c1");
    assert_eq!(stored[0].amount.value(), 4550);
    assert_eq!(stored[0].status, InvoiceStatus::Pending);
    assert_eq!(stored[0].date, Utc::now().date_naive());
    assert_eq!(ctx.cache.invalidated(), vec![INVOICES_PATH.to_string()]);
  }

  #[tokio::test]
  async fn test_create_rounds_amounts() {
    let ctx = in_memory_service();
    let use_case = CreateInvoiceUseCase::new(ctx.service.clone());

    for (raw, cents) in [("0.29", 29), ("1", 100), ("1234.567", 123457), ("0.1", 10)] {
      use_case.execute(command("c1", raw, "paid")).await;
      assert!(ctx.repo.all().iter().any(|i| i.amount.value() == cents));
    }
    assert_eq!(ctx.repo.len(), 4);
  }

  #[tokio::test]
  async fn test_zero_amount_is_rejected() {
    let ctx = in_memory_service();
    let use_case = CreateInvoiceUseCase::new(ctx.service.clone());

    let action = use_case.execute(command("c1", "0", "pending")).await;

    let InvoiceAction::Invalid(state) = action else {
      panic!("expected validation failure, got {:?}", action);
    };
    let errors = state.errors.unwrap();
    assert_eq!(errors.amount, vec![AMOUNT_GREATER_THAN_ZERO.to_string()]);
    assert_eq!(state.message.as_deref(), Some(CREATE_MISSING_FIELDS));
    assert_eq!(ctx.repo.len(), 0);
    assert!(ctx.cache.invalidated().is_empty());
  }

  #[tokio::test]
  async fn test_invalid_fields_never_reach_storage() {
    let ctx = in_memory_service();
    let use_case = CreateInvoiceUseCase::new(ctx.service.clone());

    for cmd in [
      command("", "10", "paid"),
      command("c1", "abc", "paid"),
      command("c1", "-5", "paid"),
      command("c1", "10", "draft"),
    ] {
      let action = use_case.execute(cmd).await;
      assert!(matches!(action, InvoiceAction::Invalid(_)));
    }

    assert_eq!(ctx.repo.len(), 0);
    assert!(ctx.cache.invalidated().is_empty());
  }

  #[tokio::test]
  async fn test_previous_errors_do_not_block_valid_submission() {
    let ctx = in_memory_service();
    let use_case = CreateInvoiceUseCase::new(ctx.service.clone());

    let first = use_case.execute(command("", "0", "")).await;
    let previous_state = first.form_state().cloned().unwrap();

    let action = use_case
      .execute(CreateInvoiceCommand {
        previous_state,
        ..command("c1", "10", "paid")
      })
      .await;

    assert_eq!(action, InvoiceAction::redirect_to_invoices());
    assert_eq!(ctx.repo.len(), 1);
  }

  #[tokio::test]
  async fn test_storage_failure_returns_generic_message() {
    let (service, cache) = failing_service();
    let use_case = CreateInvoiceUseCase::new(service);

    let action = use_case.execute(command("c1", "45.5", "pending")).await;

    assert_eq!(
      action,
      InvoiceAction::Failed(FormState::with_message(CREATE_DATABASE_ERROR))
    );
    assert!(cache.invalidated().is_empty());
  }
}
