//! The session store: who is logged in.
//!
//! Two states, [`Session::Anonymous`] and [`Session::Authenticated`]. The store
//! starts anonymous; [`SessionStore::init`] silently probes for an existing
//! session, [`SessionStore::login`] authenticates and
//! [`SessionStore::logout`] always returns to anonymous.

use std::sync::Arc;

use pessoa_core::{identity::Identity, messages, remote::AuthRemote};
use tokio::sync::watch;

use crate::{
  Error, Result,
  loading::{InFlight, LoadingGuard},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
  #[default]
  Anonymous,
  Authenticated(Identity),
}

/// Snapshot of the session as published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
  pub session: Session,
  in_flight:   usize,
  disposed:    bool,
}

impl SessionState {
  pub fn identity(&self) -> Option<&Identity> {
    match &self.session {
      Session::Authenticated(identity) => Some(identity),
      Session::Anonymous => None,
    }
  }

  pub fn is_authenticated(&self) -> bool { self.identity().is_some() }

  /// Whether a login, logout or probe is in flight.
  pub fn loading(&self) -> bool { self.in_flight > 0 }
}

impl InFlight for SessionState {
  fn in_flight(&mut self) -> &mut usize { &mut self.in_flight }
}

/// Handle to the session. Clones share the same session.
pub struct SessionStore<A> {
  remote: Arc<A>,
  state:  Arc<watch::Sender<SessionState>>,
}

impl<A> Clone for SessionStore<A> {
  fn clone(&self) -> Self {
    Self {
      remote: Arc::clone(&self.remote),
      state:  Arc::clone(&self.state),
    }
  }
}

impl<A: AuthRemote> SessionStore<A> {
  /// Create an anonymous store over `remote`. Call [`SessionStore::init`] to
  /// pick up an existing session.
  pub fn new(remote: A) -> Self { Self::with_shared(Arc::new(remote)) }

  pub fn with_shared(remote: Arc<A>) -> Self {
    let (state, _) = watch::channel(SessionState::default());
    Self {
      remote,
      state: Arc::new(state),
    }
  }

  pub fn snapshot(&self) -> SessionState { self.state.borrow().clone() }

  pub fn identity(&self) -> Option<Identity> { self.state.borrow().identity().cloned() }

  pub fn is_authenticated(&self) -> bool { self.state.borrow().is_authenticated() }

  /// Change notifications, e.g. to leave the login screen once
  /// authenticated.
  pub fn subscribe(&self) -> watch::Receiver<SessionState> { self.state.subscribe() }

  /// Probe for an existing session. Never fails: any probe error leaves the
  /// store anonymous.
  pub async fn init(&self) -> Option<Identity> {
    let _loading = self.begin("init")?;
    let identity = self.remote.current_identity().await?;
    tracing::info!(cpf = %identity.cpf, "existing session resumed");
    self.set(Session::Authenticated(identity.clone()));
    Some(identity)
  }

  /// Authenticate. On failure the store stays as it was and the error carries
  /// the server's message or `"Erro no login"`.
  pub async fn login(&self, cpf: &str, password: &str) -> Result<Identity> {
    let Some(_loading) = self.begin("login") else {
      return Err(Error::Disposed);
    };
    match self.remote.authenticate(cpf, password).await {
      Ok(identity) => {
        tracing::info!(cpf = %identity.cpf, "logged in");
        self.set(Session::Authenticated(identity.clone()));
        Ok(identity)
      }
      Err(e) => {
        let err = Error::remote(e, messages::LOGIN_FAILED);
        tracing::warn!(cpf, error = %err, "login failed");
        Err(err)
      }
    }
  }

  /// End the session. The store becomes anonymous even when the remote call
  /// fails; that failure is still returned.
  pub async fn logout(&self) -> Result<()> {
    let Some(_loading) = self.begin("logout") else {
      return Err(Error::Disposed);
    };
    let result = self.remote.end_session().await;
    self.set(Session::Anonymous);
    match result {
      Ok(()) => {
        tracing::info!("logged out");
        Ok(())
      }
      Err(e) => {
        let err = Error::remote(e, messages::LOGOUT_FAILED);
        tracing::warn!(error = %err, "logout failed remotely; local session cleared");
        Err(err)
      }
    }
  }

  /// Tear the store down; it reads as anonymous from here on and refuses
  /// further operations without contacting the backend.
  pub fn dispose(&self) {
    self.state.send_modify(|s| {
      s.session = Session::Anonymous;
      s.disposed = true;
    });
  }

  /// Hold the loading flag for one operation. `None` once disposed.
  fn begin(&self, op: &'static str) -> Option<LoadingGuard<'_, SessionState>> {
    if self.state.borrow().disposed {
      tracing::debug!(op, "ignored on disposed session store");
      return None;
    }
    Some(LoadingGuard::acquire(&self.state))
  }

  fn set(&self, session: Session) {
    self.state.send_if_modified(|s| {
      if s.disposed || s.session == session {
        return false;
      }
      s.session = session;
      true
    });
  }
}
