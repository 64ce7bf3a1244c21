//! Response envelopes shared by every endpoint.
//!
//! Success bodies are `{"data": T}`; error bodies expose `{"message": ...}`.

use serde::{Deserialize, Deserializer, Serialize};

/// `{"data": T}` success envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub data: T,
}

impl<T> Envelope<T> {
  pub fn new(data: T) -> Self { Self { data } }
}

/// Error envelope. Every field is optional; backends are not consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
  #[serde(default)]
  pub message: Option<String>,
}

impl ErrorBody {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: Some(message.into()) }
  }
}

/// Deserialise a field that distinguishes "absent" (`None`) from an explicit
/// `null` (`Some(None)`). Use together with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}
