//! Subcommands and their dispatch over the two stores.

use anyhow::{Result, anyhow, bail};
use clap::{Args, Subcommand};
use pessoa_core::{
  cpf,
  draft::{PersonDraft, UpdateDraft},
  person::{Gender, PersonId, SchemaVariant},
  remote::{AuthRemote, PersonRemote},
};
use pessoa_store::{PersonStore, SessionStore};

use crate::{render, settings::Settings};

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Open a session and print the identity.
  Login,
  /// Print the current identity, if any.
  Whoami,
  /// End the session.
  Logout,
  /// List persons, optionally filtered by name.
  List {
    /// Case-insensitive substring of the name.
    #[arg(short, long)]
    search: Option<String>,
  },
  /// Show every field of one person.
  Show { id: PersonId },
  /// Create a person.
  Create(CreateArgs),
  /// Update a person; omitted fields keep their current values.
  Update(UpdateArgs),
  /// Delete a person.
  Delete { id: PersonId },
  /// Check whether a CPF is registered.
  LookupCpf { cpf: String },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
  /// Use the v2 schema (address required).
  #[arg(long)]
  v2:          bool,
  #[arg(long)]
  name:        String,
  /// feminino, masculino or outro.
  #[arg(long)]
  gender:      Option<Gender>,
  #[arg(long)]
  cpf:         String,
  /// YYYY-MM-DD.
  #[arg(long)]
  birth_date:  String,
  #[arg(long, default_value = "")]
  email:       String,
  #[arg(long, default_value = "")]
  naturality:  String,
  #[arg(long, default_value = "")]
  nationality: String,
  #[arg(long, default_value = "")]
  address:     String,
  /// Password of the new person.
  #[arg(long)]
  password:    String,
}

impl CreateArgs {
  fn into_parts(self) -> (SchemaVariant, PersonDraft) {
    let variant = if self.v2 { SchemaVariant::V2 } else { SchemaVariant::V1 };
    let draft = PersonDraft {
      name:        self.name,
      gender:      self.gender,
      cpf:         cpf::mask(&self.cpf),
      birth_date:  self.birth_date,
      email:       self.email,
      naturality:  self.naturality,
      nationality: self.nationality,
      password:    self.password,
      address:     self.address,
    };
    (variant, draft)
  }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
  id:          PersonId,
  #[arg(long)]
  name:        Option<String>,
  #[arg(long, conflicts_with = "clear_gender")]
  gender:      Option<Gender>,
  /// Remove the gender.
  #[arg(long)]
  clear_gender: bool,
  #[arg(long)]
  cpf:         Option<String>,
  #[arg(long)]
  birth_date:  Option<String>,
  /// Pass an empty string to clear.
  #[arg(long)]
  email:       Option<String>,
  #[arg(long)]
  naturality:  Option<String>,
  #[arg(long)]
  nationality: Option<String>,
  #[arg(long)]
  address:     Option<String>,
}

impl UpdateArgs {
  /// Overlay the given flags onto a form pre-populated from the record.
  fn apply_to(self, form: &mut UpdateDraft) {
    if let Some(v) = self.name {
      form.name = v;
    }
    if let Some(g) = self.gender {
      form.gender = Some(g.code());
    }
    if self.clear_gender {
      form.gender = None;
    }
    if let Some(v) = self.cpf {
      form.cpf = cpf::mask(&v);
    }
    if let Some(v) = self.birth_date {
      form.birth_date = v;
    }
    if let Some(v) = self.email {
      form.email = v;
    }
    if let Some(v) = self.naturality {
      form.naturality = v;
    }
    if let Some(v) = self.nationality {
      form.nationality = v;
    }
    if let Some(v) = self.address {
      form.address = v;
    }
  }
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// Resume or open a session. With `required`, fail when neither works.
async fn ensure_session<A: AuthRemote>(
  session: &SessionStore<A>,
  settings: &Settings,
  required: bool,
) -> Result<()> {
  if session.init().await.is_some() {
    return Ok(());
  }
  match settings.credentials() {
    Some((cpf, password)) => {
      session.login(cpf, password).await?;
      Ok(())
    }
    None if required => bail!("sem sessão: informe --login-cpf e --login-password"),
    None => Ok(()),
  }
}

pub async fn run<A, R>(
  command: Command,
  settings: &Settings,
  session: &SessionStore<A>,
  people: &PersonStore<R>,
) -> Result<()>
where
  A: AuthRemote,
  R: PersonRemote,
{
  match command {
    Command::Login => {
      ensure_session(session, settings, true).await?;
      print_identity(session);
    }
    Command::Whoami => {
      ensure_session(session, settings, false).await?;
      print_identity(session);
    }
    Command::Logout => {
      ensure_session(session, settings, true).await?;
      session.logout().await?;
      println!("Sessão encerrada.");
    }
    Command::List { search } => {
      ensure_session(session, settings, true).await?;
      people.fetch_all().await;
      if let Some(message) = people.error() {
        bail!(message);
      }
      let shown = people.filtered(search.as_deref().unwrap_or_default());
      print!("{}", render::table(&shown));
    }
    Command::Show { id } => {
      ensure_session(session, settings, true).await?;
      let person = people.get_by_id(id).await?;
      print!("{}", render::detail(&person));
    }
    Command::Create(args) => {
      // Creation is open; it doubles as sign-up.
      ensure_session(session, settings, false).await?;
      let (variant, draft) = args.into_parts();
      let person = people.create_with(variant, draft).await?;
      println!("Pessoa {} criada.", person.id);
      print!("{}", render::detail(&person));
    }
    Command::Update(args) => {
      ensure_session(session, settings, true).await?;
      let id = args.id;
      let current = people.get_by_id(id).await?;
      let mut form = UpdateDraft::from_person(&current);
      args.apply_to(&mut form);
      let patch = form.into_patch()?;
      let person = people
        .update(id, &patch)
        .await
        .ok_or_else(|| anyhow!(people.error().unwrap_or_default()))?;
      print!("{}", render::detail(&person));
    }
    Command::Delete { id } => {
      ensure_session(session, settings, true).await?;
      if !people.delete(id).await {
        bail!(people.error().unwrap_or_default());
      }
      println!("Pessoa {id} removida.");
    }
    Command::LookupCpf { cpf: raw } => {
      ensure_session(session, settings, true).await?;
      let masked = cpf::mask(&raw);
      people.lookup_cpf(&masked).await?;
      println!("CPF {masked} cadastrado.");
    }
  }
  Ok(())
}

fn print_identity<A: AuthRemote>(session: &SessionStore<A>) {
  match session.identity() {
    Some(identity) => println!("{} (id {})", identity.cpf, identity.id),
    None => println!("Anônimo."),
  }
}
