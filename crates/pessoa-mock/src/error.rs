//! Error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as the backend's error envelope,
//! `{"message": "..."}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pessoa_core::wire::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  /// Injected with [`crate::MockBackend::fail_next`].
  #[error("injected failure ({status})")]
  Injected {
    status:  StatusCode,
    message: Option<String>,
  },
}

impl IntoResponse for MockError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      MockError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, Some(m)),
      MockError::NotFound(m) => (StatusCode::NOT_FOUND, Some(m)),
      MockError::BadRequest(m) => (StatusCode::BAD_REQUEST, Some(m)),
      MockError::Conflict(m) => (StatusCode::CONFLICT, Some(m)),
      MockError::Injected { status, message } => (status, message),
    };
    match message {
      Some(m) => (status, Json(ErrorBody::new(m))).into_response(),
      None => status.into_response(),
    }
  }
}
