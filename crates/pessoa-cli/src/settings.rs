//! Layered configuration: TOML file, then `PESSOA_*` environment variables,
//! then command-line flags.

use std::{path::Path, time::Duration};

use anyhow::Context as _;
use pessoa_client::{ApiConfig, transport::DEFAULT_BASE_URL};
use serde::Deserialize;

/// Runtime settings, deserialised from `pessoa.toml` and the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  /// Request timeout in seconds; unset waits indefinitely.
  #[serde(default)]
  pub timeout_secs: Option<u64>,
  /// Credentials used to open a session when none can be resumed.
  #[serde(default)]
  pub cpf:          Option<String>,
  #[serde(default)]
  pub password:     Option<String>,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }

impl Settings {
  /// Read `path` (if it exists) and overlay `PESSOA_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PESSOA"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url: self.base_url.clone(),
      timeout:  self.timeout_secs.map(Duration::from_secs),
    }
  }

  /// Both halves of the credentials, if configured.
  pub fn credentials(&self) -> Option<(&str, &str)> {
    Some((self.cpf.as_deref()?, self.password.as_deref()?))
  }
}
