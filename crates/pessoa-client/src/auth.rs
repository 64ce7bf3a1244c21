//! Session endpoints.
//!
//! | Method | Path |
//! |--------|------|
//! | `POST` | `/api/v1/Auth/authenticate` |
//! | `POST` | `/api/auth/logout` |
//! | `GET`  | `/api/v1/Auth/me` |

use pessoa_core::{
  Result,
  identity::{Credentials, Identity},
  remote::AuthRemote,
};

use reqwest::Method;

use crate::ApiClient;

pub const AUTHENTICATE: &str = "/api/v1/Auth/authenticate";
pub const LOGOUT: &str = "/api/auth/logout";
pub const ME: &str = "/api/v1/Auth/me";

impl AuthRemote for ApiClient {
  async fn authenticate<'a>(&'a self, cpf: &'a str, password: &'a str) -> Result<Identity> {
    let body = Credentials {
      cpf:      cpf.to_owned(),
      password: password.to_owned(),
    };
    self.fetch(self.request(Method::POST, AUTHENTICATE).json(&body)).await
  }

  async fn end_session(&self) -> Result<()> {
    self.execute(self.request(Method::POST, LOGOUT)).await
  }

  async fn current_identity(&self) -> Option<Identity> {
    match self.fetch(self.request(Method::GET, ME)).await {
      Ok(identity) => Some(identity),
      Err(e) => {
        tracing::debug!(error = %e, "no current session");
        None
      }
    }
  }
}
