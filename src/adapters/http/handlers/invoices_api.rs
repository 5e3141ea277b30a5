use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::dtos::RedirectResponse;
use crate::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceUseCase, FormState, InvoiceAction, InvoiceForm,
  UpdateInvoiceCommand, UpdateInvoiceUseCase,
};

/// JSON body for the invoice API: the raw form fields plus the state the
/// previous submission returned.
#[derive(Debug, Deserialize)]
pub struct InvoiceRequest {
  #[serde(flatten)]
  pub form: InvoiceForm,
  #[serde(rename = "previousState", default)]
  pub previous_state: FormState,
}

fn action_response(action: InvoiceAction, mut success: actix_web::HttpResponseBuilder) -> HttpResponse {
  match action {
    InvoiceAction::Redirect { location } => success
      .insert_header((header::LOCATION, location.as_str()))
      .json(RedirectResponse { redirect: location }),
    InvoiceAction::Completed(state) => HttpResponse::Ok().json(state),
    InvoiceAction::Invalid(state) => HttpResponse::BadRequest().json(state),
    InvoiceAction::Failed(state) => HttpResponse::InternalServerError().json(state),
  }
}

// POST /api/v1/invoices
pub async fn create_invoice(
  create_invoice_use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  body: web::Json<InvoiceRequest>,
) -> HttpResponse {
  let request = body.into_inner();

  let action = create_invoice_use_case
    .execute(CreateInvoiceCommand {
      previous_state: request.previous_state,
      form: request.form,
    })
    .await;

  action_response(action, HttpResponse::Created())
}

// PUT /api/v1/invoices/{id}
pub async fn update_invoice(
  update_invoice_use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
  path: web::Path<Uuid>,
  body: web::Json<InvoiceRequest>,
) -> HttpResponse {
  let request = body.into_inner();

  let action = update_invoice_use_case
    .execute(UpdateInvoiceCommand {
      invoice_id: path.into_inner(),
      previous_state: request.previous_state,
      form: request.form,
    })
    .await;

  action_response(action, HttpResponse::Ok())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::handlers::invoices_web::delete_invoice;
  use crate::application::invoice::DeleteInvoiceUseCase;
  use crate::application::invoice::test_support::{failing_service, in_memory_service};
  use crate::domain::invoice::{
    AmountInCents, Invoice, InvoiceService, InvoiceStatus,
  };
  use actix_web::{App, http::StatusCode, test};
  use chrono::NaiveDate;

  fn api(service: Arc<InvoiceService>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
      cfg
        .app_data(web::Data::new(Arc::new(CreateInvoiceUseCase::new(
          service.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(UpdateInvoiceUseCase::new(
          service.clone(),
        ))))
        .app_data(web::Data::new(Arc::new(DeleteInvoiceUseCase::new(service))))
        .route("/api/v1/invoices", web::post().to(create_invoice))
        .route("/api/v1/invoices/{id}", web::put().to(update_invoice))
        .route("/api/v1/invoices/{id}", web::delete().to(delete_invoice));
    }
  }

  #[actix_web::test]
  async fn test_create_invoice_json() {
    let ctx = in_memory_service();
    let app = test::init_service(App::new().configure(api(ctx.service.clone()))).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/invoices")
      .set_json(serde_json::json!({
        "customerId": "c1",
        "amount": "203.48",
        "status": "paid"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "redirect": "/dashboard/invoices" }));
    assert_eq!(ctx.repo.all()[0].amount.value(), 20348);
  }

  #[actix_web::test]
  async fn test_create_invoice_accepts_numeric_amount() {
    let ctx = in_memory_service();
    let app = test::init_service(App::new().configure(api(ctx.service.clone()))).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/invoices")
      .set_json(serde_json::json!({
        "customerId": "c1",
        "amount": 45.5,
        "status": "pending"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      "/dashboard/invoices"
    );
    assert_eq!(ctx.repo.all()[0].amount.value(), 4550);
  }

  #[actix_web::test]
  async fn test_create_invoice_returns_field_errors() {
    let ctx = in_memory_service();
    let app = test::init_service(App::new().configure(api(ctx.service.clone()))).await;

    let req = test::TestRequest::post()
      .uri("/api/v1/invoices")
      .set_json(serde_json::json!({
        "customerId": "c1",
        "amount": "abc",
        "status": "draft",
        "previousState": { "message": "Missing Fields. Failed to Create Invoice." }
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
      body,
      serde_json::json!({
        "errors": {
          "amount": ["Please enter a valid amount."],
          "status": ["Please select an invoice status."]
        },
        "message": "Missing Fields. Failed to Create Invoice."
      })
    );
    assert_eq!(ctx.repo.len(), 0);
  }

  #[actix_web::test]
  async fn test_update_invoice_json() {
    let ctx = in_memory_service();
    let invoice = Invoice {
      id: Uuid::new_v4(),
      customer_id: "c1".to_string(),
      amount: AmountInCents::from_cents(100),
      status: InvoiceStatus::Pending,
      date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    };
    ctx.repo.insert(invoice.clone());
    let app = test::init_service(App::new().configure(api(ctx.service.clone()))).await;

    let req = test::TestRequest::put()
      .uri(&format!("/api/v1/invoices/{}", invoice.id))
      .set_json(serde_json::json!({
        "customerId": "c1",
        "amount": "2",
        "status": "paid"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::LOCATION).unwrap(),
      "/dashboard/invoices"
    );
    let updated = ctx.repo.get(invoice.id).unwrap();
    assert_eq!(updated.amount.value(), 200);
    assert_eq!(updated.status, InvoiceStatus::Paid);
  }

  #[actix_web::test]
  async fn test_update_invoice_database_error() {
    let (service, cache) = failing_service();
    let app = test::init_service(App::new().configure(api(service))).await;

    let req = test::TestRequest::put()
      .uri(&format!("/api/v1/invoices/{}", Uuid::new_v4()))
      .set_json(serde_json::json!({
        "customerId": "c1",
        "amount": "2",
        "status": "paid"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
      body,
      serde_json::json!({ "message": "Database Error: Failed to Update Invoice." })
    );
    assert!(cache.invalidated().is_empty());
  }
}
