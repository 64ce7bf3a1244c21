//! Handlers for the session endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/v1/Auth/authenticate` | Body: `{"cpf":..,"password":..}`; sets the session cookie |
//! | `POST` | `/api/auth/logout` | 401 without a session |
//! | `GET`  | `/api/v1/Auth/me` | 401 without a session |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, header},
  response::IntoResponse,
};
use pessoa_core::{
  identity::{Credentials, Identity},
  wire::Envelope,
};
use uuid::Uuid;

use crate::{MockBackend, MockError, SESSION_COOKIE, session_token};

/// `POST /api/v1/Auth/authenticate`
pub async fn authenticate(
  State(backend): State<MockBackend>,
  Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, MockError> {
  backend.take_fault().await?;

  let mut inner = backend.inner.lock().await;
  let person = inner
    .people
    .iter()
    .find(|p| p.cpf == body.cpf)
    .filter(|p| inner.passwords.get(&p.id) == Some(&body.password))
    .ok_or_else(|| MockError::Unauthorized("CPF ou senha inválidos.".into()))?;

  let identity = Identity {
    id:  person.id.to_string(),
    cpf: person.cpf.clone(),
  };
  let token = Uuid::new_v4().to_string();
  inner.sessions.insert(token.clone(), identity.clone());
  tracing::debug!(cpf = %identity.cpf, "session opened");

  let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly");
  Ok(([(header::SET_COOKIE, cookie)], Json(Envelope::new(identity))))
}

/// `POST /api/auth/logout`
pub async fn logout(
  State(backend): State<MockBackend>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, MockError> {
  backend.guard(&headers).await?;
  if let Some(token) = session_token(&headers) {
    backend.inner.lock().await.sessions.remove(&token);
  }
  let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
  Ok([(header::SET_COOKIE, cookie)])
}

/// `GET /api/v1/Auth/me`
pub async fn me(
  State(backend): State<MockBackend>,
  headers: HeaderMap,
) -> Result<Json<Envelope<Identity>>, MockError> {
  let identity = backend.guard(&headers).await?;
  Ok(Json(Envelope::new(identity)))
}
