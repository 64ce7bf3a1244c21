//! Core types and trait definitions for the Pessoas data-access layer.
//!
//! This crate is deliberately free of HTTP and runtime dependencies. The
//! transport (`pessoa-client`), the stores (`pessoa-store`) and the fake
//! backend (`pessoa-mock`) all depend on it.

pub mod cpf;
pub mod draft;
pub mod error;
pub mod filter;
pub mod identity;
pub mod messages;
pub mod person;
pub mod remote;
pub mod wire;

pub use error::{Error, Result};
