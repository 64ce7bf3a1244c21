//! In-memory fake of the Pessoas backend.
//!
//! Speaks the REST contract the client consumes: `{"data": T}` envelopes,
//! `{"message": "..."}` errors and a cookie-based session. It carries no
//! business rules beyond what the client tests need to exercise: id
//! assignment, CPF uniqueness, the v2 address requirement and session checks.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let base_url = pessoa_mock::spawn(MockBackend::default()).await?;
//! ```

pub mod auth;
pub mod error;
pub mod people;

use std::{collections::HashMap, sync::Arc};

use axum::{
  Router,
  http::{HeaderMap, StatusCode, header},
  routing::{delete, get, post, put},
};
use pessoa_core::{
  identity::Identity,
  person::{NewPerson, Person, PersonId},
};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

pub use error::MockError;

/// Name of the session cookie set by `authenticate`.
pub const SESSION_COOKIE: &str = "pessoa_session";

// ─── State ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
  people:    Vec<Person>,
  passwords: HashMap<PersonId, String>,
  last_id:   PersonId,
  sessions:  HashMap<String, Identity>,
  fault:     Option<(StatusCode, Option<String>)>,
}

/// Shared backend state threaded through all handlers.
///
/// Cloning is cheap; clones observe the same records and sessions.
#[derive(Clone, Default)]
pub struct MockBackend {
  inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
  /// Insert a record directly, bypassing the HTTP surface. The record's CPF
  /// and password can then be used to authenticate.
  pub async fn seed(&self, new: NewPerson) -> Person {
    let mut inner = self.inner.lock().await;
    inner.insert(new)
  }

  /// Snapshot of all stored records, in insertion order.
  pub async fn people(&self) -> Vec<Person> {
    self.inner.lock().await.people.clone()
  }

  pub async fn session_count(&self) -> usize {
    self.inner.lock().await.sessions.len()
  }

  /// Make the next guarded request fail with `status` and, when given, an
  /// error envelope carrying `message`.
  pub async fn fail_next(&self, status: StatusCode, message: Option<&str>) {
    self.inner.lock().await.fault = Some((status, message.map(str::to_owned)));
  }

  /// Consume a pending injected failure.
  async fn take_fault(&self) -> Result<(), MockError> {
    match self.inner.lock().await.fault.take() {
      Some((status, message)) => Err(MockError::Injected { status, message }),
      None => Ok(()),
    }
  }

  /// Resolve the session identified by the request's cookie.
  async fn session(&self, headers: &HeaderMap) -> Result<Identity, MockError> {
    let token = session_token(headers)
      .ok_or_else(|| MockError::Unauthorized("Não autenticado.".into()))?;
    self
      .inner
      .lock()
      .await
      .sessions
      .get(&token)
      .cloned()
      .ok_or_else(|| MockError::Unauthorized("Sessão expirada.".into()))
  }

  /// Injected failure first, then the session check.
  async fn guard(&self, headers: &HeaderMap) -> Result<Identity, MockError> {
    self.take_fault().await?;
    self.session(headers).await
  }
}

impl Inner {
  fn insert(&mut self, new: NewPerson) -> Person {
    self.last_id += 1;
    let person = Person {
      id:          self.last_id,
      name:        new.name,
      gender:      new.gender,
      cpf:         new.cpf,
      birth_date:  new.birth_date,
      email:       new.email,
      naturality:  new.naturality,
      nationality: new.nationality,
      address:     new.address,
    };
    self.passwords.insert(person.id, new.password);
    self.people.push(person.clone());
    person
  }
}

/// Extract the session token from the `Cookie` header(s).
fn session_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value.to_owned())
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the fake backend's router.
pub fn router(backend: MockBackend) -> Router<()> {
  Router::new()
    // Session
    .route("/api/v1/Auth/authenticate", post(auth::authenticate))
    .route("/api/auth/logout", post(auth::logout))
    .route("/api/v1/Auth/me", get(auth::me))
    // People
    .route("/api/v1/people/get-all", get(people::list))
    .route("/api/v1/people/create", post(people::create_v1))
    .route("/api/v2/people/create", post(people::create_v2))
    .route("/api/v1/people/update/{id}", put(people::update))
    .route("/api/v1/people/delete/{id}", delete(people::remove))
    .route("/api/v1/people/get-by-id/{id}", get(people::get_one))
    .route("/api/v1/people/get-by-cpf/{cpf}", get(people::get_by_cpf))
    .layer(TraceLayer::new_for_http())
    .with_state(backend)
}

/// Serve `backend` on an ephemeral localhost port and return its base URL.
pub async fn spawn(backend: MockBackend) -> std::io::Result<String> {
  let listener = TcpListener::bind("127.0.0.1:0").await?;
  let address = listener.local_addr()?;
  let app = router(backend);
  tokio::spawn(async move {
    if let Err(e) = axum::serve(listener, app).await {
      tracing::error!(error = %e, "mock backend stopped");
    }
  });
  Ok(format!("http://{address}"))
}
