//! `pessoa`: command-line front end for the Pessoas backend.
//!
//! # Usage
//!
//! ```text
//! pessoa --login-cpf 000.000.000-00 --login-password admin list --search silva
//! pessoa --config ~/.config/pessoa.toml create --v2 --name "Ana Silva" ...
//! ```
//!
//! Every invocation first probes for an existing session and, when anonymous,
//! logs in with the configured credentials.

mod commands;
mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use commands::Command;
use pessoa_client::ApiClient;
use pessoa_store::{PersonStore, SessionStore};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pessoa", version, about = "Manage person records on a Pessoas backend")]
struct Args {
  /// Path to a TOML config file (base_url, timeout_secs, cpf, password).
  #[arg(short, long, value_name = "FILE", default_value = "pessoa.toml")]
  config: PathBuf,

  /// Base URL of the backend (default: http://localhost:5258).
  #[arg(long)]
  url: Option<String>,

  /// CPF used to open a session.
  #[arg(long)]
  login_cpf: Option<String>,

  /// Password used to open a session.
  #[arg(long)]
  login_password: Option<String>,

  /// Request timeout in seconds.
  #[arg(long)]
  timeout_secs: Option<u64>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // CLI flags override the environment, which overrides the config file.
  let mut settings = Settings::load(&args.config)?;
  if let Some(url) = args.url {
    settings.base_url = url;
  }
  if let Some(secs) = args.timeout_secs {
    settings.timeout_secs = Some(secs);
  }
  if let Some(cpf) = args.login_cpf {
    settings.cpf = Some(pessoa_core::cpf::mask(&cpf));
  }
  if let Some(password) = args.login_password {
    settings.password = Some(password);
  }

  let client = Arc::new(ApiClient::new(settings.api_config())?);
  let session = SessionStore::with_shared(Arc::clone(&client));
  let people = PersonStore::with_shared(client);

  let result = commands::run(args.command, &settings, &session, &people).await;

  people.dispose();
  session.dispose();
  result
}
