//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! The core reports typed failures; this is where they become HTTP statuses
//! and user-facing JSON. The mapping runs off [`ErrorKind`] so new core
//! variants land on the right status without touching this file.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use huddle_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<huddle_core::Error> for ApiError {
  fn from(e: huddle_core::Error) -> Self {
    match e.kind() {
      ErrorKind::Validation => Self::BadRequest(e.to_string()),
      ErrorKind::Conflict => Self::Conflict(e.to_string()),
      ErrorKind::Forbidden => Self::Forbidden(e.to_string()),
      ErrorKind::NotFound => Self::NotFound(e.to_string()),
      ErrorKind::Infrastructure => Self::Internal(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        return (
          StatusCode::UNAUTHORIZED,
          [(header::WWW_AUTHENTICATE, "Basic realm=\"huddle\"")],
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Internal(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
