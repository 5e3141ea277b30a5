use serde::Serialize;

/// Body of a successful invoice mutation over the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct RedirectResponse {
  /// View the caller should navigate to next
  pub redirect: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
