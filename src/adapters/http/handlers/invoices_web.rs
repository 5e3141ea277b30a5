use actix_web::{
  HttpRequest, HttpResponse,
  http::{StatusCode, header},
  web,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::{errors::ApiError, templates::TemplateEngine};
use crate::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceUseCase, DeleteInvoiceCommand, DeleteInvoiceUseCase,
  FormState, GetInvoiceCommand, GetInvoiceUseCase, INVOICES_PATH, InvoiceAction, InvoiceForm,
  ListCustomersUseCase, ListInvoicesUseCase, UpdateInvoiceCommand, UpdateInvoiceUseCase,
};
use crate::domain::invoice::{InvoiceError, PageCache, PageLookup};

const HTML: &str = "text/html; charset=utf-8";

/// Where and how an invoice form is rendered
struct FormView<'a> {
  page: &'static str,
  action_url: String,
  submit_label: &'static str,
  form: &'a InvoiceForm,
  state: &'a FormState,
}

fn is_htmx(req: &HttpRequest) -> bool {
  req.headers().contains_key("HX-Request")
}

/// htmx follows `HX-Redirect`; plain form posts get a 303 so the browser
/// switches to GET.
fn redirect(req: &HttpRequest, location: &str) -> HttpResponse {
  if is_htmx(req) {
    HttpResponse::Ok()
      .insert_header(("HX-Redirect", location))
      .finish()
  } else {
    HttpResponse::SeeOther()
      .insert_header((header::LOCATION, location))
      .finish()
  }
}

/// Renders the form, as a partial for htmx swaps and as a full page otherwise.
async fn render_form(
  req: &HttpRequest,
  templates: &TemplateEngine,
  list_customers_use_case: &ListCustomersUseCase,
  view: FormView<'_>,
  status: StatusCode,
) -> Result<HttpResponse, ApiError> {
  // A form carrying a storage error must still render without the dropdown
  let customers = match list_customers_use_case.execute().await {
    Ok(response) => response.customers,
    Err(e) => {
      tracing::warn!(error = %e, "Failed to load customers for invoice form");
      Vec::new()
    }
  };

  let mut context = tera::Context::new();
  context.insert("customers", &customers);
  context.insert("action_url", &view.action_url);
  context.insert("submit_label", view.submit_label);
  context.insert("form", view.form);
  context.insert("state", view.state);

  let template = if is_htmx(req) {
    "partials/invoice_form.html.tera"
  } else {
    view.page
  };
  let html = templates.render(template, &context)?;

  Ok(HttpResponse::build(status).content_type(HTML).body(html))
}

fn create_view<'a>(form: &'a InvoiceForm, state: &'a FormState) -> FormView<'a> {
  FormView {
    page: "pages/invoice_create.html.tera",
    action_url: format!("{}/create", INVOICES_PATH),
    submit_label: "Create Invoice",
    form,
    state,
  }
}

fn edit_view<'a>(invoice_id: Uuid, form: &'a InvoiceForm, state: &'a FormState) -> FormView<'a> {
  FormView {
    page: "pages/invoice_edit.html.tera",
    action_url: format!("{}/{}/edit", INVOICES_PATH, invoice_id),
    submit_label: "Edit Invoice",
    form,
    state,
  }
}

/// Status for a failed mutation: rejected input is the caller's fault,
/// storage failures are ours.
fn failure_status(action: &InvoiceAction) -> StatusCode {
  match action {
    InvoiceAction::Invalid(_) => StatusCode::BAD_REQUEST,
    InvoiceAction::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    InvoiceAction::Redirect { .. } | InvoiceAction::Completed(_) => StatusCode::OK,
  }
}

// GET /dashboard/invoices - Invoice list, served from the page cache when warm
pub async fn invoices_page(
  templates: web::Data<TemplateEngine>,
  list_invoices_use_case: web::Data<Arc<ListInvoicesUseCase>>,
  page_cache: web::Data<Arc<dyn PageCache>>,
) -> Result<HttpResponse, ApiError> {
  // Generation observed before reading rows; `None` skips the write-back
  let generation = match page_cache.get(INVOICES_PATH).await {
    Ok(PageLookup { body: Some(html), .. }) => {
      tracing::debug!(path = INVOICES_PATH, "Page cache hit");
      return Ok(
        HttpResponse::Ok()
          .content_type(HTML)
          .insert_header(("X-Cache", "HIT"))
          .body(html),
      );
    }
    Ok(lookup) => Some(lookup.generation),
    Err(e) => {
      tracing::warn!(error = %e, path = INVOICES_PATH, "Page cache read failed");
      None
    }
  };

  let response = list_invoices_use_case.execute().await?;

  let mut context = tera::Context::new();
  context.insert("invoices", &response.invoices);
  let html = templates.render("pages/invoices.html.tera", &context)?;

  if let Some(generation) = generation {
    match page_cache.put(INVOICES_PATH, &html, generation).await {
      Ok(true) => {}
      Ok(false) => tracing::debug!(
        path = INVOICES_PATH,
        generation,
        "Page invalidated while rendering, not caching"
      ),
      Err(e) => tracing::warn!(error = %e, path = INVOICES_PATH, "Page cache write failed"),
    }
  }

  Ok(
    HttpResponse::Ok()
      .content_type(HTML)
      .insert_header(("X-Cache", "MISS"))
      .body(html),
  )
}

// GET /dashboard/invoices/create - Empty invoice form
pub async fn invoice_create_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  list_customers_use_case: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let form = InvoiceForm::default();
  let state = FormState::default();

  render_form(
    &req,
    &templates,
    &list_customers_use_case,
    create_view(&form, &state),
    StatusCode::OK,
  )
  .await
}

// POST /dashboard/invoices/create - Create invoice from form body
pub async fn create_invoice_submit(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  create_invoice_use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  list_customers_use_case: web::Data<Arc<ListCustomersUseCase>>,
  form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, ApiError> {
  let form = form.into_inner();

  let action = create_invoice_use_case
    .execute(CreateInvoiceCommand {
      previous_state: FormState::default(),
      form: form.clone(),
    })
    .await;

  match &action {
    InvoiceAction::Redirect { location } => Ok(redirect(&req, location)),
    InvoiceAction::Completed(state) | InvoiceAction::Invalid(state) | InvoiceAction::Failed(state) => {
      render_form(
        &req,
        &templates,
        &list_customers_use_case,
        create_view(&form, state),
        failure_status(&action),
      )
      .await
    }
  }
}

// GET /dashboard/invoices/{id}/edit - Invoice form pre-filled with stored values
pub async fn invoice_edit_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  get_invoice_use_case: web::Data<Arc<GetInvoiceUseCase>>,
  list_customers_use_case: web::Data<Arc<ListCustomersUseCase>>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = path.into_inner();

  let invoice = match get_invoice_use_case
    .execute(GetInvoiceCommand { invoice_id })
    .await
  {
    Ok(invoice) => invoice,
    Err(InvoiceError::InvoiceNotFound(_)) => {
      let html = templates.render("pages/not_found.html.tera", &tera::Context::new())?;
      return Ok(HttpResponse::NotFound().content_type(HTML).body(html));
    }
    Err(e) => return Err(e.into()),
  };

  let state = FormState::default();

  render_form(
    &req,
    &templates,
    &list_customers_use_case,
    edit_view(invoice.id, &invoice.form, &state),
    StatusCode::OK,
  )
  .await
}

// POST /dashboard/invoices/{id}/edit - Update invoice from form body
pub async fn update_invoice_submit(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  update_invoice_use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
  list_customers_use_case: web::Data<Arc<ListCustomersUseCase>>,
  path: web::Path<Uuid>,
  form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = path.into_inner();
  let form = form.into_inner();

  let action = update_invoice_use_case
    .execute(UpdateInvoiceCommand {
      invoice_id,
      previous_state: FormState::default(),
      form: form.clone(),
    })
    .await;

  match &action {
    InvoiceAction::Redirect { location } => Ok(redirect(&req, location)),
    InvoiceAction::Completed(state) | InvoiceAction::Invalid(state) | InvoiceAction::Failed(state) => {
      render_form(
        &req,
        &templates,
        &list_customers_use_case,
        edit_view(invoice_id, &form, state),
        failure_status(&action),
      )
      .await
    }
  }
}

// DELETE /dashboard/invoices/{id} - Delete invoice, answers `{ "message": .. }`
pub async fn delete_invoice(
  delete_invoice_use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
  path: web::Path<Uuid>,
) -> HttpResponse {
  let action = delete_invoice_use_case
    .execute(DeleteInvoiceCommand {
      invoice_id: path.into_inner(),
    })
    .await;

  match action {
    InvoiceAction::Redirect { location } => HttpResponse::SeeOther()
      .insert_header((header::LOCATION, location))
      .finish(),
    InvoiceAction::Completed(state) => HttpResponse::Ok().json(state),
    InvoiceAction::Invalid(state) => HttpResponse::BadRequest().json(state),
    InvoiceAction::Failed(state) => HttpResponse::InternalServerError().json(state),
  }
}
