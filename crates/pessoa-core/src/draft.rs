//! Form drafts: raw user input turned into request bodies.
//!
//! Validation here runs before any request is issued. Blank optional fields
//! collapse to `None` so they travel as `null`.

use crate::{
  Error, Result, messages,
  person::{Gender, NewPerson, Person, PersonPatch, SchemaVariant, parse_date_prefix},
};

/// Minimum number of characters a trimmed name must exceed.
pub const NAME_MIN_EXCLUSIVE: usize = 4;

fn blank_to_none(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn check_name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.chars().count() <= NAME_MIN_EXCLUSIVE {
    return Err(Error::Validation(messages::NAME_TOO_SHORT.into()));
  }
  Ok(name.to_owned())
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Raw input of the "create person" form.
#[derive(Clone, Default)]
pub struct PersonDraft {
  pub name:        String,
  pub gender:      Option<Gender>,
  pub cpf:         String,
  /// `YYYY-MM-DD`, or a timestamp whose date portion is used.
  pub birth_date:  String,
  pub email:       String,
  pub naturality:  String,
  pub nationality: String,
  pub password:    String,
  /// Ignored by the v1 schema.
  pub address:     String,
}

impl PersonDraft {
  /// Validate and build the create body for `variant`.
  pub fn into_new_person(self, variant: SchemaVariant) -> Result<NewPerson> {
    let name = check_name(&self.name)?;

    let address = match variant {
      SchemaVariant::V1 => None,
      SchemaVariant::V2 => Some(
        blank_to_none(&self.address)
          .ok_or_else(|| Error::Validation(messages::ADDRESS_REQUIRED.into()))?,
      ),
    };

    let birth_date = parse_date_prefix(&self.birth_date)
      .ok_or_else(|| Error::Validation(messages::INVALID_BIRTH_DATE.into()))?;

    Ok(NewPerson {
      name,
      gender: self.gender.map(Gender::code),
      cpf: self.cpf.trim().to_owned(),
      birth_date,
      email: blank_to_none(&self.email),
      naturality: blank_to_none(&self.naturality),
      nationality: blank_to_none(&self.nationality),
      password: self.password,
      address,
    })
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Input of the "update person" form, pre-populated from a loaded record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDraft {
  pub name:        String,
  pub gender:      Option<u8>,
  pub cpf:         String,
  pub birth_date:  String,
  pub email:       String,
  pub naturality:  String,
  pub nationality: String,
  pub address:     String,
}

impl UpdateDraft {
  /// Fill the form from `person`: absent optionals become empty strings and
  /// the birth date is shown date-only.
  pub fn from_person(person: &Person) -> Self {
    Self {
      name:        person.name.clone(),
      gender:      person.gender,
      cpf:         person.cpf.clone(),
      birth_date:  person.birth_date.format("%Y-%m-%d").to_string(),
      email:       person.email.clone().unwrap_or_default(),
      naturality:  person.naturality.clone().unwrap_or_default(),
      nationality: person.nationality.clone().unwrap_or_default(),
      address:     person.address.clone().unwrap_or_default(),
    }
  }

  /// Build the full patch the update form submits.
  pub fn into_patch(self) -> Result<PersonPatch> {
    let birth_date = parse_date_prefix(&self.birth_date)
      .ok_or_else(|| Error::Validation(messages::INVALID_BIRTH_DATE.into()))?;

    Ok(PersonPatch {
      name:        Some(self.name.trim().to_owned()),
      gender:      Some(self.gender),
      cpf:         Some(self.cpf.trim().to_owned()),
      birth_date:  Some(birth_date),
      email:       Some(blank_to_none(&self.email)),
      naturality:  Some(blank_to_none(&self.naturality)),
      nationality: Some(blank_to_none(&self.nationality)),
      address:     Some(blank_to_none(&self.address)),
    })
  }
}
