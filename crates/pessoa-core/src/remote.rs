//! The remote seams the stores are generic over.
//!
//! `pessoa-client` implements both traits over HTTP. Tests implement them with
//! in-memory fakes.
//!
//! All methods return `Send` futures so stores can be driven from a
//! multi-threaded tokio runtime.

use std::future::Future;

use crate::{
  Result,
  identity::Identity,
  person::{NewPerson, Person, PersonId, PersonPatch, SchemaVariant},
};

/// Session endpoints.
pub trait AuthRemote: Send + Sync {
  /// Exchange credentials for an identity; the backend also sets the session
  /// cookie.
  fn authenticate<'a>(
    &'a self,
    cpf: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Identity>> + Send + 'a;

  /// End the current session.
  fn end_session(&self) -> impl Future<Output = Result<()>> + Send + '_;

  /// Resolve the current session's identity.
  ///
  /// Never fails: any error, including a transient one, reads as `None`.
  fn current_identity(&self) -> impl Future<Output = Option<Identity>> + Send + '_;
}

/// Person endpoints. Each method is a single request returning the unwrapped
/// envelope payload.
pub trait PersonRemote: Send + Sync {
  fn list_all(&self) -> impl Future<Output = Result<Vec<Person>>> + Send + '_;

  /// Create a person through the endpoint selected by `variant`.
  fn create<'a>(
    &'a self,
    variant: SchemaVariant,
    data: &'a NewPerson,
  ) -> impl Future<Output = Result<Person>> + Send + 'a;

  fn update<'a>(
    &'a self,
    id: PersonId,
    patch: &'a PersonPatch,
  ) -> impl Future<Output = Result<Person>> + Send + 'a;

  fn delete(&self, id: PersonId) -> impl Future<Output = Result<()>> + Send + '_;

  fn get_by_id(&self, id: PersonId) -> impl Future<Output = Result<Person>> + Send + '_;

  /// Look a person up by CPF. The payload is discarded; only success or
  /// failure is reported.
  fn get_by_cpf<'a>(&'a self, cpf: &'a str) -> impl Future<Output = Result<()>> + Send + 'a;
}
