use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Pending,
  Paid,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "pending",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  /// Form values are matched exactly; `Paid` is not a valid status.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(InvoiceStatus::Pending),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

// Amount - stored as integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountInCents(i64);

impl AmountInCents {
  /// Converts a dollar amount to cents with `round(amount * 100)`.
  ///
  /// The amount must be finite and strictly positive. Rounding follows the
  /// float multiplication, so `0.29` becomes `29` even though `0.29 * 100`
  /// is `28.999999999999996`.
  pub fn from_dollars(amount: f64) -> Result<Self, ValueObjectError> {
    if !amount.is_finite() {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Amount must be a finite number, got {}",
        amount
      )));
    }
    if amount <= 0.0 {
      return Err(ValueObjectError::InvalidAmount(
        "Amount must be greater than zero".to_string(),
      ));
    }

    let cents = (amount * 100.0).round();
    if cents >= i64::MAX as f64 {
      return Err(ValueObjectError::InvalidAmount(
        "Amount is too large".to_string(),
      ));
    }

    Ok(Self(cents as i64))
  }

  pub fn from_cents(cents: i64) -> Self {
    Self(cents)
  }

  pub fn value(&self) -> i64 {
    self.0
  }

  /// Dollar value with two decimal places
  pub fn to_decimal(&self) -> Decimal {
    Decimal::new(self.0, 2)
  }
}

impl fmt::Display for AmountInCents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "${:.2}", self.to_decimal())
  }
}
