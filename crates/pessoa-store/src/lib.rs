//! Process-wide state for the Pessoas client: the session and the person
//! collection.
//!
//! Both stores are explicit objects generic over the remote seams in
//! [`pessoa_core::remote`], created with `new` and torn down with `dispose`.
//! Handles are cheap to clone and share one state, published through a
//! [`tokio::sync::watch`] channel so consumers can re-render on change.

mod loading;

pub mod error;
pub mod people;
pub mod session;

pub use error::{Error, Result};
pub use people::{PersonState, PersonStore};
pub use session::{Session, SessionState, SessionStore};

#[cfg(test)]
mod tests;
