//! Error types for `pessoa-core`.

use thiserror::Error;

/// Failure of a remote call or of local form validation.
///
/// Remote failures keep the server-supplied `message` (when the error body was
/// an envelope) separate from the status so callers can pick a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// Rejected locally before any request was issued.
  #[error("{0}")]
  Validation(String),

  #[error("request rejected with status {status}{}", suffix(.message))]
  Status {
    status:  u16,
    message: Option<String>,
  },

  #[error("transport error: {0}")]
  Transport(String),

  #[error("unexpected response body: {0}")]
  Decode(String),
}

fn suffix(message: &Option<String>) -> String {
  message
    .as_deref()
    .map(|m| format!(": {m}"))
    .unwrap_or_default()
}

impl Error {
  /// The `message` field of the server's error envelope, if there was one.
  pub fn server_message(&self) -> Option<&str> {
    match self {
      Error::Status { message, .. } => message.as_deref(),
      _ => None,
    }
  }

  /// The user-facing message for this failure: validation text as-is, the
  /// server message when present, otherwise `fallback`.
  pub fn message_or(&self, fallback: &str) -> String {
    match self {
      Error::Validation(m) => m.clone(),
      other => other.server_message().unwrap_or(fallback).to_owned(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
