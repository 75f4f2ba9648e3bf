//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use bierzmowanie_core::{Classify, ErrorClass};
use serde_json::json;
use thiserror::Error;

use crate::token::AuthError;

/// An error returned by an API handler. Every variant renders as
/// `{"success": false, "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Unauthenticated(String),

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Persistence(String),
}

impl ApiError {
  /// Map a classified domain or store error onto a response. Persistence
  /// failures are logged here; their detail reaches the client only when
  /// `expose_detail` is set.
  pub fn classify<E>(e: E, expose_detail: bool) -> Self
  where
    E: std::error::Error + Classify,
  {
    match e.class() {
      ErrorClass::Validation => Self::Validation(e.to_string()),
      ErrorClass::NotFound => Self::NotFound(e.to_string()),
      ErrorClass::Persistence => {
        tracing::error!(error = %e, "persistence failure");
        if expose_detail {
          Self::Persistence(e.to_string())
        } else {
          Self::Persistence("internal server error".into())
        }
      }
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
      Self::Forbidden(_) => StatusCode::FORBIDDEN,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<AuthError> for ApiError {
  fn from(e: AuthError) -> Self { Self::Unauthenticated(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { Self::Validation(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { Self::Validation(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(json!({ "success": false, "message": self.to_string() }))).into_response()
  }
}
