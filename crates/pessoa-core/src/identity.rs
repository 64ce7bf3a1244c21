//! The authenticated actor.

use serde::{Deserialize, Serialize};

/// Identity payload returned by `authenticate` and the "who am I" probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Opaque identity token assigned by the backend.
  pub id:  String,
  pub cpf: String,
}

/// Credentials posted to the authenticate endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
  pub cpf:      String,
  pub password: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("cpf", &self.cpf)
      .field("password", &"<redacted>")
      .finish()
  }
}
