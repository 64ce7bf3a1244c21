//! HTTP implementation of the Pessoas remote operations.
//!
//! A single [`ApiClient`] is bound to one base origin and keeps a cookie jar,
//! so the session cookie set by `authenticate` rides along on every later
//! request. It implements [`pessoa_core::remote::AuthRemote`] and
//! [`pessoa_core::remote::PersonRemote`].

mod auth;
mod people;
pub mod transport;

pub use transport::{ApiClient, ApiConfig, BuildError};
