pub mod create_invoice;
pub mod delete_invoice;
pub mod form;
pub mod get_invoice;
pub mod list_customers;
pub mod list_invoices;
pub mod update_invoice;

#[cfg(test)]
pub(crate) mod test_support;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceUseCase};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceUseCase};
pub use form::{FieldErrors, FormState, InvoiceForm};
pub use get_invoice::{GetInvoiceCommand, GetInvoiceResponse, GetInvoiceUseCase};
pub use list_customers::{CustomerDto, ListCustomersResponse, ListCustomersUseCase};
pub use list_invoices::{InvoiceListItemDto, ListInvoicesResponse, ListInvoicesUseCase};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};

/// Path of the invoice list view; invalidated after every successful mutation
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Outcome of an invoice mutation
///
/// Redirects are a success value of their own, so no failure branch can
/// swallow them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceAction {
  /// Mutation committed; send the caller to `location`
  Redirect { location: String },
  /// Mutation committed; caller stays on the current view
  Completed(FormState),
  /// Field validation failed, storage untouched
  Invalid(FormState),
  /// Storage rejected the statement
  Failed(FormState),
}

impl InvoiceAction {
  pub fn redirect_to_invoices() -> Self {
    InvoiceAction::Redirect {
      location: INVOICES_PATH.to_string(),
    }
  }

  /// Form state to render back to the caller, if any
  pub fn form_state(&self) -> Option<&FormState> {
    match self {
      InvoiceAction::Redirect { .. } => None,
      InvoiceAction::Completed(state)
      | InvoiceAction::Invalid(state)
      | InvoiceAction::Failed(state) => Some(state),
    }
  }
}
