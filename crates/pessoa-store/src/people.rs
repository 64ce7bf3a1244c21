//! The person collection store.
//!
//! Holds the last known list of persons plus `loading` and `error`, and wraps
//! each remote person operation with a confirmed mutation of that list:
//!
//! | Operation | On success | On failure |
//! |-----------|-----------|------------|
//! | `fetch_all` | replace `items` | keep stale `items` |
//! | `create` / `create_v2` | append, return `Ok(person)` | return `Err` |
//! | `update` | replace by `id` in place, return `Some` | return `None` |
//! | `delete` | remove by `id`, return `true` | return `false` |
//!
//! Every failure also records its user-facing message in `error`. Overlapping
//! calls are not coordinated: whichever response lands last wins.

use std::sync::Arc;

use pessoa_core::{
  draft::PersonDraft,
  filter,
  messages,
  person::{Person, PersonId, PersonPatch, SchemaVariant},
  remote::PersonRemote,
};
use tokio::sync::watch;

use crate::{
  Error, Result,
  loading::{InFlight, LoadingGuard},
};

// ─── State ────────────────────────────────────────────────────────────────────

/// Snapshot of the collection as published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonState {
  /// Known persons; ids are unique.
  pub items: Vec<Person>,
  /// Message of the most recent failed operation, cleared when the next one
  /// starts.
  pub error: Option<String>,
  in_flight: usize,
  disposed:  bool,
}

impl PersonState {
  /// Whether any operation is in flight.
  pub fn loading(&self) -> bool { self.in_flight > 0 }

  pub fn is_disposed(&self) -> bool { self.disposed }

  fn upsert_last(&mut self, person: Person) {
    self.items.retain(|p| p.id != person.id);
    self.items.push(person);
  }
}

impl InFlight for PersonState {
  fn in_flight(&mut self) -> &mut usize { &mut self.in_flight }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Handle to the person collection. Clones share the same collection.
pub struct PersonStore<R> {
  remote: Arc<R>,
  state:  Arc<watch::Sender<PersonState>>,
}

impl<R> Clone for PersonStore<R> {
  fn clone(&self) -> Self {
    Self {
      remote: Arc::clone(&self.remote),
      state:  Arc::clone(&self.state),
    }
  }
}

impl<R: PersonRemote> PersonStore<R> {
  /// Create an empty store over `remote`.
  pub fn new(remote: R) -> Self { Self::with_shared(Arc::new(remote)) }

  /// Create an empty store over an already shared remote.
  pub fn with_shared(remote: Arc<R>) -> Self {
    let (state, _) = watch::channel(PersonState::default());
    Self {
      remote,
      state: Arc::new(state),
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn snapshot(&self) -> PersonState { self.state.borrow().clone() }

  pub fn items(&self) -> Vec<Person> { self.state.borrow().items.clone() }

  pub fn loading(&self) -> bool { self.state.borrow().loading() }

  pub fn error(&self) -> Option<String> { self.state.borrow().error.clone() }

  /// Persons whose names contain `term`, case-insensitively.
  pub fn filtered(&self, term: &str) -> Vec<Person> {
    let state = self.state.borrow();
    filter::by_name(&state.items, term)
      .into_iter()
      .cloned()
      .collect()
  }

  /// Change notifications; the receiver sees every published snapshot.
  pub fn subscribe(&self) -> watch::Receiver<PersonState> { self.state.subscribe() }

  // ── Operations ────────────────────────────────────────────────────────────

  /// Replace the collection with the backend's list.
  pub async fn fetch_all(&self) {
    let Some(_loading) = self.begin("fetch_all") else {
      return;
    };
    match self.remote.list_all().await {
      Ok(items) => {
        tracing::debug!(count = items.len(), "persons fetched");
        self.commit(|s| s.items = items);
      }
      Err(e) => self.fail(e, messages::FETCH_FAILED),
    }
  }

  /// Validate `draft` and create it through the v1 endpoint.
  pub async fn create(&self, draft: PersonDraft) -> Result<Person> {
    self.create_with(SchemaVariant::V1, draft).await
  }

  /// Validate `draft` and create it through the v2 endpoint.
  pub async fn create_v2(&self, draft: PersonDraft) -> Result<Person> {
    self.create_with(SchemaVariant::V2, draft).await
  }

  /// Validate `draft` for `variant` and create it.
  ///
  /// Validation failures return [`Error::Invalid`] without a request and
  /// without touching the store's state. Remote failures are recorded in
  /// `error` and returned.
  pub async fn create_with(&self, variant: SchemaVariant, draft: PersonDraft) -> Result<Person> {
    let data = draft
      .into_new_person(variant)
      .map_err(|e| Error::remote(e, messages::CREATE_FAILED))?;

    let Some(_loading) = self.begin("create") else {
      return Err(Error::Disposed);
    };
    match self.remote.create(variant, &data).await {
      Ok(person) => {
        tracing::debug!(id = person.id, ?variant, "person created");
        let appended = person.clone();
        self.commit(|s| s.upsert_last(appended));
        Ok(person)
      }
      Err(e) => {
        let err = Error::remote(e, messages::CREATE_FAILED);
        tracing::warn!(error = %err, ?variant, "create failed");
        let message = err.message();
        self.commit(|s| s.error = Some(message));
        Err(err)
      }
    }
  }

  /// Update person `id`. Returns the backend's record, or `None` on failure.
  pub async fn update(&self, id: PersonId, patch: &PersonPatch) -> Option<Person> {
    let _loading = self.begin("update")?;
    match self.remote.update(id, patch).await {
      Ok(person) => {
        tracing::debug!(id, "person updated");
        let replacement = person.clone();
        self.commit(|s| {
          for slot in s.items.iter_mut().filter(|p| p.id == id) {
            *slot = replacement.clone();
          }
        });
        Some(person)
      }
      Err(e) => {
        self.fail(e, messages::UPDATE_FAILED);
        None
      }
    }
  }

  /// Delete person `id`. Returns whether the backend accepted the deletion.
  pub async fn delete(&self, id: PersonId) -> bool {
    let Some(_loading) = self.begin("delete") else {
      return false;
    };
    match self.remote.delete(id).await {
      Ok(()) => {
        tracing::debug!(id, "person deleted");
        self.commit(|s| s.items.retain(|p| p.id != id));
        true
      }
      Err(e) => {
        self.fail(e, messages::DELETE_FAILED);
        false
      }
    }
  }

  /// Load one person to pre-populate an edit form. Does not touch the
  /// collection.
  pub async fn get_by_id(&self, id: PersonId) -> Result<Person> {
    self.remote.get_by_id(id).await.map_err(|e| {
      tracing::warn!(error = %e, id, "load failed");
      Error::Remote {
        message: messages::LOAD_FAILED.to_owned(),
        source:  e,
      }
    })
  }

  /// Check that a person with `cpf` exists. Does not touch the collection.
  pub async fn lookup_cpf(&self, cpf: &str) -> Result<()> {
    self
      .remote
      .get_by_cpf(cpf)
      .await
      .map_err(|e| Error::remote(e, messages::LOOKUP_FAILED))
  }

  /// Tear the store down: the collection is cleared and responses that land
  /// afterwards are discarded.
  pub fn dispose(&self) {
    self.state.send_modify(|s| {
      s.items.clear();
      s.error = None;
      s.disposed = true;
    });
    tracing::debug!("person store disposed");
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Start an operation: hold the loading flag and clear the last error.
  /// `None` once the store is disposed.
  fn begin(&self, op: &'static str) -> Option<LoadingGuard<'_, PersonState>> {
    if self.state.borrow().disposed {
      tracing::debug!(op, "ignored on disposed store");
      return None;
    }
    tracing::debug!(op, "start");
    let guard = LoadingGuard::acquire(&self.state);
    self.commit(|s| s.error = None);
    Some(guard)
  }

  /// Apply `f` unless the store was disposed in the meantime.
  fn commit(&self, f: impl FnOnce(&mut PersonState)) {
    self.state.send_if_modified(|s| {
      if s.disposed {
        tracing::debug!("discarding result for disposed store");
        return false;
      }
      f(s);
      true
    });
  }

  fn fail(&self, e: pessoa_core::Error, fallback: &str) {
    let message = e.message_or(fallback);
    tracing::warn!(error = %e, "{message}");
    self.commit(|s| s.error = Some(message));
  }
}
