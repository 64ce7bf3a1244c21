//! Person records and the request bodies that create or modify them.
//!
//! Field names follow the backend's camelCase JSON. Birth dates travel as
//! ISO date strings; a full timestamp is accepted on read and truncated to its
//! date portion.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::wire::nullable;

/// Server-assigned person identifier.
pub type PersonId = i64;

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Canonical gender codes: `0 = Feminino`, `1 = Masculino`, `2 = Outro`.
///
/// The variant names double as the display labels.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  strum::Display,
  strum::EnumIter,
  strum::EnumString,
  strum::FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Gender {
  Feminino  = 0,
  Masculino = 1,
  Outro     = 2,
}

impl Gender {
  /// Wire code for this gender.
  pub fn code(self) -> u8 { self as u8 }

  /// Display label for a raw wire code; unknown or absent codes render empty.
  pub fn label(code: Option<u8>) -> String {
    code
      .and_then(Gender::from_repr)
      .map(|g| g.to_string())
      .unwrap_or_default()
  }
}

// ─── Schema variant ──────────────────────────────────────────────────────────

/// Which create endpoint (and body schema) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
  /// `/api/v1/people/create`, without an address field.
  #[default]
  V1,
  /// `/api/v2/people/create`; the address is required.
  V2,
}

impl SchemaVariant {
  pub fn requires_address(self) -> bool { matches!(self, Self::V2) }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// One managed individual as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:          PersonId,
  pub name:        String,
  /// Raw wire code; see [`Gender`] for the canonical mapping.
  #[serde(default)]
  pub gender:      Option<u8>,
  pub cpf:         String,
  #[serde(deserialize_with = "date_prefix")]
  pub birth_date:  NaiveDate,
  #[serde(default)]
  pub email:       Option<String>,
  #[serde(default)]
  pub naturality:  Option<String>,
  #[serde(default)]
  pub nationality: Option<String>,
  #[serde(default)]
  pub address:     Option<String>,
}

impl Person {
  pub fn gender(&self) -> Option<Gender> {
    self.gender.and_then(Gender::from_repr)
  }

  pub fn gender_label(&self) -> String { Gender::label(self.gender) }
}

/// Parse the date portion of an ISO date or timestamp string
/// (`1990-01-01` or `1990-01-01T00:00:00`).
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
  let date = raw.trim().split('T').next().unwrap_or_default();
  NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn date_prefix<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  parse_date_prefix(&raw)
    .ok_or_else(|| serde::de::Error::custom(format!("invalid birth date {raw:?}")))
}

// ─── Create body ─────────────────────────────────────────────────────────────

/// Body of the create endpoints. The password is write-only and never
/// returned by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
  pub name:        String,
  pub gender:      Option<u8>,
  pub cpf:         String,
  pub birth_date:  NaiveDate,
  pub email:       Option<String>,
  pub naturality:  Option<String>,
  pub nationality: Option<String>,
  pub password:    String,
  /// Only sent by the v2 endpoint.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:     Option<String>,
}

impl NewPerson {
  /// The body as sent for `variant`: v1 never carries an address.
  pub fn for_variant(&self, variant: SchemaVariant) -> NewPerson {
    match variant {
      SchemaVariant::V1 => NewPerson { address: None, ..self.clone() },
      SchemaVariant::V2 => self.clone(),
    }
  }
}

impl std::fmt::Debug for NewPerson {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NewPerson")
      .field("name", &self.name)
      .field("gender", &self.gender)
      .field("cpf", &self.cpf)
      .field("birth_date", &self.birth_date)
      .field("email", &self.email)
      .field("naturality", &self.naturality)
      .field("nationality", &self.nationality)
      .field("password", &"<redacted>")
      .field("address", &self.address)
      .finish()
  }
}

// ─── Update body ─────────────────────────────────────────────────────────────

/// Partial person sent to the update endpoint.
///
/// Outer `None` leaves a field out of the body; for nullable fields
/// `Some(None)` sends an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub gender:      Option<Option<u8>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cpf:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_date:  Option<NaiveDate>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub email:       Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub naturality:  Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub nationality: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub address:     Option<Option<String>>,
}

impl PersonPatch {
  pub fn is_empty(&self) -> bool { *self == PersonPatch::default() }

  /// Return `person` with every field present in this patch overwritten.
  pub fn apply(&self, person: &Person) -> Person {
    let mut out = person.clone();
    if let Some(name) = &self.name {
      out.name = name.clone();
    }
    if let Some(gender) = self.gender {
      out.gender = gender;
    }
    if let Some(cpf) = &self.cpf {
      out.cpf = cpf.clone();
    }
    if let Some(birth_date) = self.birth_date {
      out.birth_date = birth_date;
    }
    if let Some(email) = &self.email {
      out.email = email.clone();
    }
    if let Some(naturality) = &self.naturality {
      out.naturality = naturality.clone();
    }
    if let Some(nationality) = &self.nationality {
      out.nationality = nationality.clone();
    }
    if let Some(address) = &self.address {
      out.address = address.clone();
    }
    out
  }
}
