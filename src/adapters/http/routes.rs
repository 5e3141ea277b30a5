use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, INVOICES_PATH,
  ListCustomersUseCase, ListInvoicesUseCase, UpdateInvoiceUseCase,
};
use crate::domain::invoice::PageCache;

use super::handlers::{invoices_api, invoices_web};
use super::templates::TemplateEngine;

/// Everything the invoice dashboard needs, built once in `main`
#[derive(Clone)]
pub struct InvoiceRouteDependencies {
  pub templates: TemplateEngine,
  pub page_cache: Arc<dyn PageCache>,
  pub create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  pub update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
  pub get_invoice_use_case: Arc<GetInvoiceUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub list_customers_use_case: Arc<ListCustomersUseCase>,
}

/// Configure the invoice dashboard routes
///
/// # Routes
///
/// - GET / - Redirect to the invoice list
/// - GET /dashboard/invoices - Invoice list (page cached)
/// - GET /dashboard/invoices/create - Create form
/// - POST /dashboard/invoices/create - Create invoice
/// - GET /dashboard/invoices/{id}/edit - Edit form
/// - POST /dashboard/invoices/{id}/edit - Update invoice
/// - DELETE /dashboard/invoices/{id} - Delete invoice
///
/// # Example
///
/// ```no_run
/// use actix_web::App;
/// # use invoice_desk::adapters::http::routes::{InvoiceRouteDependencies, configure_invoice_web_routes};
///
/// # fn example(deps: InvoiceRouteDependencies) {
/// let app = App::new().configure(|cfg| configure_invoice_web_routes(cfg, deps));
/// # }
/// ```
pub fn configure_invoice_web_routes(cfg: &mut web::ServiceConfig, deps: InvoiceRouteDependencies) {
  cfg.route(
    "/",
    web::get().to(|| async {
      HttpResponse::Found()
        .insert_header(("Location", INVOICES_PATH))
        .finish()
    }),
  );

  cfg.service(
    web::scope(INVOICES_PATH)
      .app_data(web::Data::new(deps.templates))
      .app_data(web::Data::new(deps.page_cache))
      .app_data(web::Data::new(deps.create_invoice_use_case))
      .app_data(web::Data::new(deps.update_invoice_use_case))
      .app_data(web::Data::new(deps.delete_invoice_use_case))
      .app_data(web::Data::new(deps.get_invoice_use_case))
      .app_data(web::Data::new(deps.list_invoices_use_case))
      .app_data(web::Data::new(deps.list_customers_use_case))
      .route("", web::get().to(invoices_web::invoices_page))
      .route("/create", web::get().to(invoices_web::invoice_create_page))
      .route("/create", web::post().to(invoices_web::create_invoice_submit))
      .route("/{id}/edit", web::get().to(invoices_web::invoice_edit_page))
      .route("/{id}/edit", web::post().to(invoices_web::update_invoice_submit))
      .route("/{id}", web::delete().to(invoices_web::delete_invoice)),
  );
}

/// Configure the JSON invoice routes
///
/// Mounted under a scope such as `/api/v1/invoices`.
///
/// # Routes
///
/// - POST / - Create invoice
/// - PUT /{id} - Update invoice
/// - DELETE /{id} - Delete invoice
pub fn configure_invoice_api_routes(
  cfg: &mut web::ServiceConfig,
  create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
) {
  cfg
    .app_data(web::Data::new(create_invoice_use_case))
    .app_data(web::Data::new(update_invoice_use_case))
    .app_data(web::Data::new(delete_invoice_use_case))
    .route("", web::post().to(invoices_api::create_invoice))
    .route("/{id}", web::put().to(invoices_api::update_invoice))
    .route("/{id}", web::delete().to(invoices_web::delete_invoice));
}
