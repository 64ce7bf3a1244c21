//! Error type for `pessoa-store`.

use thiserror::Error;

/// A store operation failed. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// Rejected by local validation; no request was issued.
  #[error("{0}")]
  Invalid(String),

  /// The remote call failed.
  #[error("{message}")]
  Remote {
    message: String,
    #[source]
    source:  pessoa_core::Error,
  },

  #[error("Operação indisponível: os dados já foram descartados.")]
  Disposed,
}

impl Error {
  /// Wrap a remote failure, taking the server's message when it sent one and
  /// `fallback` otherwise.
  pub fn remote(source: pessoa_core::Error, fallback: &str) -> Self {
    match source {
      pessoa_core::Error::Validation(m) => Error::Invalid(m),
      source => Error::Remote {
        message: source.message_or(fallback),
        source,
      },
    }
  }

  /// The user-facing message.
  pub fn message(&self) -> String { self.to_string() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
