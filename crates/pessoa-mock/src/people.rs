//! Handlers for the person endpoints.
//!
//! Creation is open (it doubles as sign-up from the login screen); every
//! other endpoint requires a session.

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
};
use pessoa_core::{
  person::{NewPerson, Person, PersonId, PersonPatch, SchemaVariant},
  wire::Envelope,
};

use crate::{MockBackend, MockError};

type Data<T> = Result<Json<Envelope<T>>, MockError>;

fn not_found() -> MockError { MockError::NotFound("Pessoa não encontrada.".into()) }

/// `GET /api/v1/people/get-all`
pub async fn list(State(backend): State<MockBackend>, headers: HeaderMap) -> Data<Vec<Person>> {
  backend.guard(&headers).await?;
  Ok(Json(Envelope::new(backend.people().await)))
}

/// `POST /api/v1/people/create`
pub async fn create_v1(State(backend): State<MockBackend>, Json(body): Json<NewPerson>) -> Data<Person> {
  create(backend, SchemaVariant::V1, body).await
}

/// `POST /api/v2/people/create`
pub async fn create_v2(State(backend): State<MockBackend>, Json(body): Json<NewPerson>) -> Data<Person> {
  create(backend, SchemaVariant::V2, body).await
}

async fn create(backend: MockBackend, variant: SchemaVariant, body: NewPerson) -> Data<Person> {
  backend.take_fault().await?;

  let body = body.for_variant(variant);
  if variant.requires_address() && body.address.as_deref().is_none_or(|a| a.trim().is_empty()) {
    return Err(MockError::BadRequest("O endereço é obrigatório.".into()));
  }

  let mut inner = backend.inner.lock().await;
  if inner.people.iter().any(|p| p.cpf == body.cpf) {
    return Err(MockError::Conflict("CPF já cadastrado.".into()));
  }
  let person = inner.insert(body);
  tracing::debug!(id = person.id, ?variant, "person created");
  Ok(Json(Envelope::new(person)))
}

/// `PUT /api/v1/people/update/{id}`
pub async fn update(
  State(backend): State<MockBackend>,
  headers: HeaderMap,
  Path(id): Path<PersonId>,
  Json(patch): Json<PersonPatch>,
) -> Data<Person> {
  backend.guard(&headers).await?;
  let mut inner = backend.inner.lock().await;
  let slot = inner
    .people
    .iter_mut()
    .find(|p| p.id == id)
    .ok_or_else(not_found)?;
  *slot = patch.apply(slot);
  Ok(Json(Envelope::new(slot.clone())))
}

/// `DELETE /api/v1/people/delete/{id}`
pub async fn remove(
  State(backend): State<MockBackend>,
  headers: HeaderMap,
  Path(id): Path<PersonId>,
) -> Result<StatusCode, MockError> {
  backend.guard(&headers).await?;
  let mut inner = backend.inner.lock().await;
  let before = inner.people.len();
  inner.people.retain(|p| p.id != id);
  if inner.people.len() == before {
    return Err(not_found());
  }
  inner.passwords.remove(&id);
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/people/get-by-id/{id}`
pub async fn get_one(
  State(backend): State<MockBackend>,
  headers: HeaderMap,
  Path(id): Path<PersonId>,
) -> Data<Person> {
  backend.guard(&headers).await?;
  let inner = backend.inner.lock().await;
  let person = inner.people.iter().find(|p| p.id == id).cloned().ok_or_else(not_found)?;
  Ok(Json(Envelope::new(person)))
}

/// `GET /api/v1/people/get-by-cpf/{cpf}`
pub async fn get_by_cpf(
  State(backend): State<MockBackend>,
  headers: HeaderMap,
  Path(cpf): Path<String>,
) -> Data<Person> {
  backend.guard(&headers).await?;
  let inner = backend.inner.lock().await;
  let person = inner.people.iter().find(|p| p.cpf == cpf).cloned().ok_or_else(not_found)?;
  Ok(Json(Envelope::new(person)))
}
