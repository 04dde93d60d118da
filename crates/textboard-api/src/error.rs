//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Identifier assignment kept colliding; the client may retry.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert any backend error via its [`textboard_core::Error`] form.
  pub fn from_store<E: Into<textboard_core::Error>>(err: E) -> Self {
    let err: textboard_core::Error = err.into();
    err.into()
  }
}

impl From<textboard_core::Error> for ApiError {
  fn from(err: textboard_core::Error) -> Self {
    use textboard_core::Error as E;
    if err.is_transient() {
      return ApiError::Conflict(err.to_string());
    }
    match err {
      E::UnknownBoard(_) | E::UnknownThread { .. } => ApiError::NotFound(err.to_string()),
      E::IdentifierConflict { .. } => ApiError::Conflict(err.to_string()),
      E::StorageUnavailable(source) => ApiError::Store(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
