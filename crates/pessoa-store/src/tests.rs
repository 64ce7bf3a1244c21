//! Store tests against in-memory fake remotes.

use std::{
  collections::VecDeque,
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::NaiveDate;
use pessoa_core::{
  draft::PersonDraft,
  identity::Identity,
  messages,
  person::{Gender, NewPerson, Person, PersonId, PersonPatch, SchemaVariant},
  remote::{AuthRemote, PersonRemote},
};
use tokio::sync::{Mutex, oneshot};

use crate::{Error, PersonStore, Session, SessionStore};

// ─── Fakes ───────────────────────────────────────────────────────────────────

fn person(id: PersonId, name: &str) -> Person {
  Person {
    id,
    name: name.into(),
    gender: Some(1),
    cpf: format!("{id:03}.111.111-11"),
    birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    email: None,
    naturality: None,
    nationality: None,
    address: None,
  }
}

fn server_error(message: &str) -> pessoa_core::Error {
  pessoa_core::Error::Status {
    status:  400,
    message: Some(message.into()),
  }
}

fn bare_error() -> pessoa_core::Error {
  pessoa_core::Error::Status { status: 500, message: None }
}

#[derive(Default)]
struct FakePeople {
  records:      Mutex<Vec<Person>>,
  last_id:      AtomicUsize,
  calls:        AtomicUsize,
  fail_next:    Mutex<Option<pessoa_core::Error>>,
  /// Each call takes the next gate (if any) and waits for it before answering.
  gates:        Mutex<VecDeque<oneshot::Receiver<()>>>,
  last_variant: Mutex<Option<SchemaVariant>>,
}

impl FakePeople {
  fn with(records: Vec<Person>) -> Self {
    let last = records.iter().map(|p| p.id).max().unwrap_or(0);
    Self {
      records: Mutex::new(records),
      last_id: AtomicUsize::new(last as usize),
      ..Default::default()
    }
  }

  async fn failing(self, err: pessoa_core::Error) -> Self {
    *self.fail_next.lock().await = Some(err);
    self
  }

  async fn gate(&self) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.gates.lock().await.push_back(rx);
    tx
  }

  fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  async fn enter(&self) -> pessoa_core::Result<()> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let gate = self.gates.lock().await.pop_front();
    if let Some(gate) = gate {
      let _ = gate.await;
    }
    match self.fail_next.lock().await.take() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }
}

impl PersonRemote for FakePeople {
  async fn list_all(&self) -> pessoa_core::Result<Vec<Person>> {
    self.enter().await?;
    Ok(self.records.lock().await.clone())
  }

  async fn create<'a>(
    &'a self,
    variant: SchemaVariant,
    data: &'a NewPerson,
  ) -> pessoa_core::Result<Person> {
    self.enter().await?;
    *self.last_variant.lock().await = Some(variant);
    let id = self.last_id.fetch_add(1, Ordering::SeqCst) as PersonId + 1;
    let data = data.for_variant(variant);
    let created = Person {
      id,
      name: data.name,
      gender: data.gender,
      cpf: data.cpf,
      birth_date: data.birth_date,
      email: data.email,
      naturality: data.naturality,
      nationality: data.nationality,
      address: data.address,
    };
    self.records.lock().await.push(created.clone());
    Ok(created)
  }

  async fn update<'a>(
    &'a self,
    id: PersonId,
    patch: &'a PersonPatch,
  ) -> pessoa_core::Result<Person> {
    self.enter().await?;
    let mut records = self.records.lock().await;
    let slot = records
      .iter_mut()
      .find(|p| p.id == id)
      .ok_or_else(|| server_error("Pessoa não encontrada."))?;
    *slot = patch.apply(slot);
    Ok(slot.clone())
  }

  async fn delete(&self, id: PersonId) -> pessoa_core::Result<()> {
    self.enter().await?;
    self.records.lock().await.retain(|p| p.id != id);
    Ok(())
  }

  async fn get_by_id(&self, id: PersonId) -> pessoa_core::Result<Person> {
    self.enter().await?;
    self
      .records
      .lock()
      .await
      .iter()
      .find(|p| p.id == id)
      .cloned()
      .ok_or_else(|| server_error("Pessoa não encontrada."))
  }

  async fn get_by_cpf<'a>(&'a self, cpf: &'a str) -> pessoa_core::Result<()> {
    self.enter().await?;
    let found = self.records.lock().await.iter().any(|p| p.cpf == cpf);
    if found { Ok(()) } else { Err(server_error("Pessoa não encontrada.")) }
  }
}

#[derive(Default)]
struct FakeAuth {
  current:     Mutex<Option<Identity>>,
  fail_login:  Mutex<Option<pessoa_core::Error>>,
  fail_logout: Mutex<Option<pessoa_core::Error>>,
  probe_calls: AtomicUsize,
  auth_calls:  AtomicUsize,
}

fn identity() -> Identity {
  Identity {
    id:  "42".into(),
    cpf: "123.456.789-01".into(),
  }
}

impl AuthRemote for FakeAuth {
  async fn authenticate<'a>(
    &'a self,
    cpf: &'a str,
    _password: &'a str,
  ) -> pessoa_core::Result<Identity> {
    self.auth_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(err) = self.fail_login.lock().await.take() {
      return Err(err);
    }
    let identity = Identity {
      id:  "42".into(),
      cpf: cpf.into(),
    };
    *self.current.lock().await = Some(identity.clone());
    Ok(identity)
  }

  async fn end_session(&self) -> pessoa_core::Result<()> {
    self.auth_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(err) = self.fail_logout.lock().await.take() {
      return Err(err);
    }
    *self.current.lock().await = None;
    Ok(())
  }

  async fn current_identity(&self) -> Option<Identity> {
    self.probe_calls.fetch_add(1, Ordering::SeqCst);
    self.current.lock().await.clone()
  }
}

fn draft(name: &str) -> PersonDraft {
  PersonDraft {
    name:        name.into(),
    gender:      Some(Gender::Feminino),
    cpf:         "999.888.777-66".into(),
    birth_date:  "1992-05-20".into(),
    email:       "".into(),
    naturality:  "Salvador".into(),
    nationality: "Brasileira".into(),
    password:    "s3nha".into(),
    address:     "Av. Sete, 100".into(),
  }
}

/// Wait until `cond` holds, polling the runtime.
async fn until(mut cond: impl FnMut() -> bool) {
  tokio::time::timeout(Duration::from_secs(5), async {
    while !cond() {
      tokio::task::yield_now().await;
    }
  })
  .await
  .expect("condition never held");
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_loads_single_record() {
  let store = PersonStore::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  store.fetch_all().await;

  let state = store.snapshot();
  assert_eq!(state.items, vec![person(1, "Ana Silva")]);
  assert!(!state.loading());
  assert_eq!(state.error, None);
}

#[tokio::test]
async fn fetch_all_failure_keeps_stale_items() {
  let remote = Arc::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let store = PersonStore::with_shared(remote.clone());
  store.fetch_all().await;

  *remote.fail_next.lock().await = Some(bare_error());
  remote.records.lock().await.clear();
  store.fetch_all().await;

  let state = store.snapshot();
  assert_eq!(state.items.len(), 1, "stale items survive a failed fetch");
  assert_eq!(state.error.as_deref(), Some(messages::FETCH_FAILED));
  assert!(!state.loading());
}

#[tokio::test]
async fn next_operation_clears_previous_error() {
  let remote = FakePeople::with(vec![]).failing(bare_error()).await;
  let store = PersonStore::new(remote);
  store.fetch_all().await;
  assert!(store.error().is_some());

  store.fetch_all().await;
  assert_eq!(store.error(), None);
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_appends_after_existing_entries() {
  let store = PersonStore::new(FakePeople::with(vec![
    person(1, "Ana Silva"),
    person(2, "Bruno Costa"),
  ]));
  store.fetch_all().await;

  let created = store.create(draft("Carla Dias")).await.unwrap();
  let items = store.items();
  assert_eq!(items.len(), 3);
  assert_eq!(items.last(), Some(&created));
  assert_eq!(items.iter().filter(|p| p.id == created.id).count(), 1);
  assert_eq!(&items[..2], &[person(1, "Ana Silva"), person(2, "Bruno Costa")]);
  assert_eq!(created.email, None, "blank email is sent as null");
  assert_eq!(created.address, None, "v1 drops the address");
}

#[tokio::test]
async fn create_v2_uses_second_schema() {
  let remote = Arc::new(FakePeople::default());
  let store = PersonStore::with_shared(remote.clone());

  let created = store.create_v2(draft("Carla Dias")).await.unwrap();
  assert_eq!(created.address.as_deref(), Some("Av. Sete, 100"));
  assert_eq!(*remote.last_variant.lock().await, Some(SchemaVariant::V2));
  assert_eq!(store.items(), vec![created]);
}

#[tokio::test]
async fn create_never_duplicates_an_id() {
  let remote = Arc::new(FakePeople::with(vec![
    person(1, "Ana Silva"),
    person(2, "Bruno Costa"),
  ]));
  let store = PersonStore::with_shared(remote.clone());
  store.fetch_all().await;

  // The backend hands out an id the collection already holds.
  remote.last_id.store(0, Ordering::SeqCst);
  let created = store.create(draft("Carla Dias")).await.unwrap();
  assert_eq!(created.id, 1);

  let items = store.items();
  assert_eq!(items.iter().filter(|p| p.id == 1).count(), 1);
  assert_eq!(items.last(), Some(&created));
  assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn short_name_is_rejected_locally() {
  let remote = Arc::new(FakePeople::default());
  let store = PersonStore::with_shared(remote.clone());
  let rx = store.subscribe();

  let err = store.create(draft("Abc")).await.unwrap_err();
  assert_eq!(err, Error::Invalid(messages::NAME_TOO_SHORT.into()));
  assert_eq!(err.to_string(), "O nome deve ter mais de 4 caracteres.");
  assert_eq!(remote.calls(), 0, "no remote call is issued");
  assert!(!rx.has_changed().unwrap(), "store state is untouched");
  assert_eq!(store.error(), None);
}

#[tokio::test]
async fn create_failure_rejects_with_server_message() {
  let remote = FakePeople::default()
    .failing(server_error("CPF já cadastrado."))
    .await;
  let store = PersonStore::new(remote);

  let err = store.create(draft("Carla Dias")).await.unwrap_err();
  assert_eq!(err.message(), "CPF já cadastrado.");
  assert!(matches!(err, Error::Remote { .. }));
  assert_eq!(store.error().as_deref(), Some("CPF já cadastrado."));
  assert!(store.items().is_empty());
  assert!(!store.loading());
}

#[tokio::test]
async fn create_failure_without_message_uses_fallback() {
  let store = PersonStore::new(FakePeople::default().failing(bare_error()).await);
  let err = store.create_v2(draft("Carla Dias")).await.unwrap_err();
  assert_eq!(err.message(), messages::CREATE_FAILED);
  assert_eq!(store.error().as_deref(), Some(messages::CREATE_FAILED));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_in_place() {
  let store = PersonStore::new(FakePeople::with(vec![
    person(1, "Ana Silva"),
    person(2, "Bruno Costa"),
    person(3, "Carla Dias"),
  ]));
  store.fetch_all().await;
  let before = store.items();

  let patch = PersonPatch {
    name: Some("Bruno C. Costa".into()),
    ..Default::default()
  };
  let updated = store.update(2, &patch).await.unwrap();
  let after = store.items();

  assert_eq!(after.len(), before.len());
  assert_eq!(after[1], updated);
  assert_eq!(after[1].name, "Bruno C. Costa");
  assert_eq!(after[0], before[0]);
  assert_eq!(after[2], before[2]);
}

#[tokio::test]
async fn update_failure_returns_none_and_records_error() {
  let remote = Arc::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let store = PersonStore::with_shared(remote.clone());
  store.fetch_all().await;

  *remote.fail_next.lock().await = Some(bare_error());
  let result = store.update(1, &PersonPatch::default()).await;

  assert_eq!(result, None);
  assert_eq!(store.error().as_deref(), Some(messages::UPDATE_FAILED));
  assert_eq!(store.items(), vec![person(1, "Ana Silva")]);
  assert!(!store.loading());
}

#[tokio::test]
async fn update_failure_prefers_server_message() {
  let store = PersonStore::new(FakePeople::default());
  assert_eq!(store.update(77, &PersonPatch::default()).await, None);
  assert_eq!(store.error().as_deref(), Some("Pessoa não encontrada."));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_exactly_one() {
  let store = PersonStore::new(FakePeople::with(vec![
    person(1, "Ana Silva"),
    person(2, "Bruno Costa"),
    person(3, "Carla Dias"),
  ]));
  store.fetch_all().await;

  assert!(store.delete(2).await);
  assert_eq!(
    store.items(),
    vec![person(1, "Ana Silva"), person(3, "Carla Dias")]
  );
}

#[tokio::test]
async fn delete_failure_returns_false() {
  let remote = Arc::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let store = PersonStore::with_shared(remote.clone());
  store.fetch_all().await;

  *remote.fail_next.lock().await = Some(bare_error());
  assert!(!store.delete(1).await);
  assert_eq!(store.error().as_deref(), Some(messages::DELETE_FAILED));
  assert_eq!(store.items().len(), 1);
  assert!(!store.loading());
}

// ─── Loading flag ────────────────────────────────────────────────────────────

#[tokio::test]
async fn loading_is_held_only_while_in_flight() {
  let remote = Arc::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let store = PersonStore::with_shared(remote.clone());
  let gate = remote.gate().await;
  assert!(!store.loading());

  let task = tokio::spawn({
    let store = store.clone();
    async move { store.fetch_all().await }
  });

  let mut rx = store.subscribe();
  rx.wait_for(|s| s.loading()).await.unwrap();
  assert!(store.items().is_empty(), "nothing applied before the response");

  gate.send(()).unwrap();
  task.await.unwrap();
  assert!(!store.loading());
  assert_eq!(store.items().len(), 1);
}

#[tokio::test]
async fn loading_released_on_failure_and_cancellation() {
  let remote = Arc::new(FakePeople::default());
  let store = PersonStore::with_shared(remote.clone());

  *remote.fail_next.lock().await = Some(bare_error());
  assert!(!store.delete(1).await);
  assert!(!store.loading());

  // Dropping an in-flight operation releases its hold.
  let _gate = remote.gate().await;
  let task = tokio::spawn({
    let store = store.clone();
    async move { store.fetch_all().await }
  });
  store.subscribe().wait_for(|s| s.loading()).await.unwrap();
  task.abort();
  let _ = task.await;
  assert!(!store.loading());
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_updates_last_response_wins() {
  let remote = Arc::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let store = PersonStore::with_shared(remote.clone());
  store.fetch_all().await;

  let first_gate = remote.gate().await;
  let second_gate = remote.gate().await;

  let first = tokio::spawn({
    let store = store.clone();
    async move {
      let patch = PersonPatch { name: Some("Primeira Versão".into()), ..Default::default() };
      store.update(1, &patch).await
    }
  });
  until(|| remote.calls() == 2).await;

  let second = tokio::spawn({
    let store = store.clone();
    async move {
      let patch = PersonPatch { name: Some("Segunda Versão".into()), ..Default::default() };
      store.update(1, &patch).await
    }
  });
  until(|| remote.calls() == 3).await;

  // The later request lands first...
  second_gate.send(()).unwrap();
  assert!(second.await.unwrap().is_some());
  assert_eq!(store.items()[0].name, "Segunda Versão");
  assert!(store.loading(), "first update is still in flight");

  // ...and the earlier one lands last and wins.
  first_gate.send(()).unwrap();
  assert!(first.await.unwrap().is_some());
  assert_eq!(store.items()[0].name, "Primeira Versão");
  assert_eq!(store.items().len(), 1);
  assert!(!store.loading());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn filtered_matches_name_substring() {
  let store = PersonStore::new(FakePeople::with(vec![
    person(1, "Ana Silva"),
    person(2, "Bruno Costa"),
    person(3, "Mariana Silva"),
  ]));
  store.fetch_all().await;
  let ids: Vec<_> = store.filtered("SILVA").iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn get_by_id_uses_fixed_message_and_leaves_collection() {
  let store = PersonStore::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  assert_eq!(store.get_by_id(1).await.unwrap(), person(1, "Ana Silva"));
  assert!(store.items().is_empty());

  let err = store.get_by_id(9).await.unwrap_err();
  assert_eq!(err.message(), messages::LOAD_FAILED);
  assert_eq!(store.error(), None);
}

#[tokio::test]
async fn lookup_cpf_reports_existence_only() {
  let store = PersonStore::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  store.lookup_cpf("001.111.111-11").await.unwrap();
  let err = store.lookup_cpf("000.000.000-00").await.unwrap_err();
  assert_eq!(err.message(), "Pessoa não encontrada.");
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn dispose_discards_late_responses() {
  let remote = Arc::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let store = PersonStore::with_shared(remote.clone());
  let gate = remote.gate().await;

  let task = tokio::spawn({
    let store = store.clone();
    async move { store.fetch_all().await }
  });
  until(|| remote.calls() == 1).await;

  store.dispose();
  gate.send(()).unwrap();
  task.await.unwrap();

  assert!(store.items().is_empty());
  assert!(store.snapshot().is_disposed());
  assert!(!store.delete(1).await);
  assert_eq!(store.create(draft("Carla Dias")).await.unwrap_err(), Error::Disposed);
  assert_eq!(remote.calls(), 1, "disposed store issues no requests");
}

#[tokio::test]
async fn independent_stores_do_not_share_state() {
  let a = PersonStore::new(FakePeople::with(vec![person(1, "Ana Silva")]));
  let b = PersonStore::new(FakePeople::with(vec![]));
  a.fetch_all().await;
  b.fetch_all().await;
  assert_eq!(a.items().len(), 1);
  assert!(b.items().is_empty());
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_starts_anonymous() {
  let store = SessionStore::new(FakeAuth::default());
  assert!(!store.is_authenticated());
  assert_eq!(store.snapshot().session, Session::Anonymous);
}

#[tokio::test]
async fn init_resumes_existing_session() {
  let auth = FakeAuth::default();
  *auth.current.lock().await = Some(identity());
  let store = SessionStore::new(auth);

  assert_eq!(store.init().await, Some(identity()));
  assert!(store.is_authenticated());
  assert_eq!(store.identity(), Some(identity()));
}

#[tokio::test]
async fn init_without_session_stays_anonymous() {
  let auth = Arc::new(FakeAuth::default());
  let store = SessionStore::with_shared(auth.clone());
  assert_eq!(store.init().await, None);
  assert!(!store.is_authenticated());
  assert!(!store.snapshot().loading());
  assert_eq!(auth.probe_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn login_notifies_subscribers() {
  let store = SessionStore::new(FakeAuth::default());
  let mut rx = store.subscribe();

  let identity = store.login("123.456.789-01", "s3nha").await.unwrap();
  assert_eq!(identity.cpf, "123.456.789-01");

  let state = rx.wait_for(|s| s.is_authenticated()).await.unwrap().clone();
  assert_eq!(state.identity(), Some(&identity));
  assert!(!state.loading());
}

#[tokio::test]
async fn login_failure_keeps_anonymous() {
  let auth = FakeAuth::default();
  *auth.fail_login.lock().await = Some(server_error("CPF ou senha inválidos."));
  let store = SessionStore::new(auth);

  let err = store.login("123.456.789-01", "errada").await.unwrap_err();
  assert_eq!(err.message(), "CPF ou senha inválidos.");
  assert!(!store.is_authenticated());
}

#[tokio::test]
async fn login_failure_without_message_uses_fallback() {
  let auth = FakeAuth::default();
  *auth.fail_login.lock().await = Some(pessoa_core::Error::Transport("refused".into()));
  let store = SessionStore::new(auth);

  let err = store.login("123.456.789-01", "s3nha").await.unwrap_err();
  assert_eq!(err.message(), "Erro no login");
}

#[tokio::test]
async fn logout_returns_to_anonymous() {
  let store = SessionStore::new(FakeAuth::default());
  store.login("123.456.789-01", "s3nha").await.unwrap();
  store.logout().await.unwrap();
  assert!(!store.is_authenticated());
  assert_eq!(store.init().await, None);
}

#[tokio::test]
async fn logout_clears_state_even_when_remote_fails() {
  let auth = Arc::new(FakeAuth::default());
  let store = SessionStore::with_shared(auth.clone());
  store.login("123.456.789-01", "s3nha").await.unwrap();

  *auth.fail_logout.lock().await = Some(bare_error());
  let err = store.logout().await.unwrap_err();
  assert_eq!(err.message(), "Erro no logout");
  assert!(!store.is_authenticated());
}

#[tokio::test]
async fn disposed_session_refuses_operations_without_remote_calls() {
  let remote = Arc::new(FakeAuth::default());
  *remote.current.lock().await = Some(identity());
  let store = SessionStore::with_shared(Arc::clone(&remote));
  store.dispose();

  assert_eq!(
    store.login("123.456.789-01", "s3nha").await.unwrap_err(),
    Error::Disposed
  );
  assert_eq!(store.logout().await.unwrap_err(), Error::Disposed);
  assert_eq!(store.init().await, None);

  assert_eq!(remote.auth_calls.load(Ordering::SeqCst), 0);
  assert_eq!(remote.probe_calls.load(Ordering::SeqCst), 0);
  assert!(!store.is_authenticated());
  assert!(!store.snapshot().loading());
  assert_eq!(
    Error::Disposed.message(),
    "Operação indisponível: os dados já foram descartados."
  );
}
