//! Standalone fake backend for local use of the `pessoa` CLI.
//!
//! ```
//! cargo run -p pessoa-mock -- --port 5258 --admin-cpf 000.000.000-00 --admin-password admin
//! ```

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use pessoa_core::person::NewPerson;
use pessoa_mock::MockBackend;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "In-memory fake of the Pessoas backend")]
struct Cli {
  #[arg(long, default_value = "127.0.0.1")]
  host: String,

  #[arg(short, long, default_value_t = 5258)]
  port: u16,

  /// CPF of the seeded account.
  #[arg(long, default_value = "000.000.000-00")]
  admin_cpf: String,

  /// Password of the seeded account.
  #[arg(long, default_value = "admin")]
  admin_password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let backend = MockBackend::default();
  backend
    .seed(NewPerson {
      name:        "Administrador".into(),
      gender:      None,
      cpf:         cli.admin_cpf.clone(),
      birth_date:  NaiveDate::default(),
      email:       None,
      naturality:  None,
      nationality: None,
      password:    cli.admin_password,
      address:     None,
    })
    .await;

  let app = pessoa_mock::router(backend);
  let address = format!("{}:{}", cli.host, cli.port);

  tracing::info!(admin_cpf = %cli.admin_cpf, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
