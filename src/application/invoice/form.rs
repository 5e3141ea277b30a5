use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::invoice::{AmountInCents, InvoiceFields, InvoiceStatus};

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_GREATER_THAN_ZERO: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_NOT_A_NUMBER: &str = "Please enter a valid amount.";
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// Raw invoice form body as submitted by the browser
///
/// Missing fields deserialize to empty strings so that they surface as field
/// errors instead of a body parsing failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InvoiceForm {
  #[serde(rename = "customerId", default)]
  #[validate(custom(function = "validate_customer_id"))]
  pub customer_id: String,

  #[serde(default, deserialize_with = "amount_text")]
  #[validate(custom(function = "validate_amount"))]
  pub amount: String,

  #[serde(default)]
  #[validate(custom(function = "validate_status"))]
  pub status: String,
}

/// JSON clients may send the amount as a number; forms always send text
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
  Text(String),
  Int(i64),
  Float(f64),
}

fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<RawAmount>::deserialize(deserializer)? {
    Some(RawAmount::Text(text)) => text,
    Some(RawAmount::Int(value)) => value.to_string(),
    Some(RawAmount::Float(value)) => value.to_string(),
    None => String::new(),
  })
}

impl InvoiceForm {
  /// Validates every field and coerces the form into typed invoice fields.
  pub fn parse(&self) -> Result<InvoiceFields, FieldErrors> {
    self.validate()?;

    let amount = coerce_amount(&self.amount).map_err(FieldErrors::amount)?;
    let status = InvoiceStatus::from_str(&self.status)
      .map_err(|_| FieldErrors::status(field_error("status_enum", STATUS_REQUIRED)))?;

    Ok(InvoiceFields {
      customer_id: self.customer_id.trim().to_string(),
      amount,
      status,
    })
  }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(Cow::Borrowed(message));
  error
}

/// String to cents coercion: blank is zero, anything else must parse as a
/// finite number strictly greater than zero.
fn coerce_amount(raw: &str) -> Result<AmountInCents, ValidationError> {
  let trimmed = raw.trim();
  let value = if trimmed.is_empty() {
    0.0
  } else {
    parse_number(trimmed).ok_or_else(|| field_error("amount_type", AMOUNT_NOT_A_NUMBER))?
  };

  if !value.is_finite() {
    return Err(field_error("amount_type", AMOUNT_NOT_A_NUMBER));
  }

  AmountInCents::from_dollars(value).map_err(|_| field_error("amount_gt", AMOUNT_GREATER_THAN_ZERO))
}

/// Decimal or exponent notation, or an unsigned `0x`/`0o`/`0b` integer literal
fn parse_number(text: &str) -> Option<f64> {
  let radix = match text.get(..2) {
    Some("0x" | "0X") => 16,
    Some("0o" | "0O") => 8,
    Some("0b" | "0B") => 2,
    _ => return text.parse::<f64>().ok(),
  };

  let digits = &text[2..];
  if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
    return None;
  }
  u128::from_str_radix(digits, radix).ok().map(|value| value as f64)
}

fn validate_customer_id(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(field_error("customer_required", CUSTOMER_REQUIRED));
  }
  Ok(())
}

fn validate_amount(value: &str) -> Result<(), ValidationError> {
  coerce_amount(value).map(|_| ())
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
  InvoiceStatus::from_str(value)
    .map(|_| ())
    .map_err(|_| field_error("status_enum", STATUS_REQUIRED))
}

/// Per-field error messages, keyed by form field name when serialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub customer_id: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub amount: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub status: Vec<String>,
}

impl FieldErrors {
  fn amount(error: ValidationError) -> Self {
    Self {
      amount: vec![message_of(&error, "amount")],
      ..Self::default()
    }
  }

  fn status(error: ValidationError) -> Self {
    Self {
      status: vec![message_of(&error, "status")],
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    self.customer_id.is_empty() && self.amount.is_empty() && self.status.is_empty()
  }
}

fn message_of(error: &ValidationError, field: &str) -> String {
  error
    .message
    .as_ref()
    .map(|m| m.to_string())
    .unwrap_or_else(|| format!("Invalid field: {}", field))
}

impl From<ValidationErrors> for FieldErrors {
  fn from(errors: ValidationErrors) -> Self {
    let mut field_errors = FieldErrors::default();

    for (field, errors) in errors.field_errors() {
      let field = field.to_string();
      let messages = errors.iter().map(|error| message_of(error, &field));

      match field.as_str() {
        "customer_id" => field_errors.customer_id.extend(messages),
        "amount" => field_errors.amount.extend(messages),
        "status" => field_errors.status.extend(messages),
        other => tracing::warn!(field = other, "Validation error for unknown invoice field"),
      }
    }

    field_errors
  }
}

/// Result of a form submission, threaded back into the next submission
///
/// Serializes to `{ "errors"?: {..}, "message"?: ".." }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub errors: Option<FieldErrors>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl FormState {
  pub fn invalid(errors: FieldErrors, message: &str) -> Self {
    Self {
      errors: Some(errors),
      message: Some(message.to_string()),
    }
  }

  pub fn with_message(message: &str) -> Self {
    Self {
      errors: None,
      message: Some(message.to_string()),
    }
  }

  pub fn has_errors(&self) -> bool {
    self.errors.as_ref().is_some_and(|e| !e.is_empty())
  }
}
