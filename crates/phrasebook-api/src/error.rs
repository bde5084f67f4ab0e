//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every rejection carries a machine-readable reason in a JSON `detail`
//! field, matching the wire format clients already parse.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler or the access gate.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or invalid credential.
  #[error("Unauthorized")]
  Unauthorized,

  #[error("{0}")]
  NotFound(String),

  /// Malformed request rejected at the validation boundary, before any
  /// engine logic runs (e.g. limit over the ceiling).
  #[error("{0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error.
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}
