//! Inputs to the relationship upsert operations, and their validation.
//!
//! Field names on the wire follow the parish office forms (`imie`,
//! `nazwisko`, ...). Every input is validated before a transaction begins.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result, address::AddressInput};

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Return the trimmed value, or a validation error naming `field`.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::validation(format!("{field} is required")))
  } else {
    Ok(trimmed)
  }
}

/// Treat blank optional strings as absent.
pub fn present(value: &Option<String>) -> Option<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
}

/// Keep `"email": null` apart from a missing key: missing deserializes to
/// `None`, anything present to `Some(..)`.
fn explicit<'de, D>(d: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(d).map(Some)
}

/// How a save changes one contact channel. `None` keeps the stored value,
/// `Some(None)` clears it (sent as `null` or blank), `Some(Some(v))`
/// replaces it.
pub fn contact_change(value: &Option<Option<String>>) -> Option<Option<String>> {
  value.as_ref().map(present)
}

fn check_email(email: &Option<String>) -> Result<()> {
  match present(email) {
    Some(e) if !e.contains('@') => {
      Err(Error::validation(format!("email {e:?} is not an address")))
    }
    _ => Ok(()),
  }
}

// ─── Parent ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentInput {
  #[serde(rename = "imie", default)]
  pub given_name:  String,
  #[serde(rename = "nazwisko", default)]
  pub family_name: String,
  #[serde(default, deserialize_with = "explicit")]
  pub email:       Option<Option<String>>,
  #[serde(rename = "telefon", default, deserialize_with = "explicit")]
  pub phone:       Option<Option<String>>,
  #[serde(rename = "adres", default)]
  pub address:     Option<AddressInput>,
}

impl ParentInput {
  pub fn validate(&self) -> Result<()> {
    require("imie", &self.given_name)?;
    require("nazwisko", &self.family_name)?;
    check_email(&self.email.clone().flatten())?;
    if let Some(a) = &self.address {
      a.validate()?;
    }
    Ok(())
  }
}

// ─── Witness ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WitnessInput {
  #[serde(rename = "imie", default)]
  pub given_name:  String,
  #[serde(rename = "nazwisko", default)]
  pub family_name: String,
  #[serde(default, deserialize_with = "explicit")]
  pub email:       Option<Option<String>>,
  #[serde(rename = "telefon", default, deserialize_with = "explicit")]
  pub phone:       Option<Option<String>>,
  #[serde(rename = "adres", default)]
  pub address:     Option<AddressInput>,
}

impl WitnessInput {
  pub fn validate(&self) -> Result<()> {
    require("imie", &self.given_name)?;
    require("nazwisko", &self.family_name)?;
    check_email(&self.email.clone().flatten())?;
    if let Some(a) = &self.address {
      a.validate()?;
    }
    Ok(())
  }
}

// ─── School enrollment ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolEnrollmentInput {
  #[serde(rename = "szkola_id", default)]
  pub school_id:   Option<i64>,
  /// Class within the school, e.g. "8b".
  #[serde(rename = "klasa", default)]
  pub grade:       String,
  /// e.g. "2025/2026".
  #[serde(rename = "rok_szkolny", default)]
  pub school_year: String,
}

impl SchoolEnrollmentInput {
  /// Returns the school id once all three fields are present.
  pub fn validate(&self) -> Result<i64> {
    let school_id = self
      .school_id
      .ok_or_else(|| Error::validation("szkola_id is required"))?;
    require("klasa", &self.grade)?;
    require("rok_szkolny", &self.school_year)?;
    Ok(school_id)
  }
}

// ─── Confirmation name ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmationNameInput {
  #[serde(rename = "imie", default)]
  pub name:          String,
  #[serde(rename = "uzasadnienie", default)]
  pub justification: String,
}

impl ConfirmationNameInput {
  pub fn validate(&self) -> Result<()> {
    require("imie", &self.name)?;
    require("uzasadnienie", &self.justification)?;
    Ok(())
  }
}

// ─── Memberships ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupAssignment {
  #[serde(rename = "grupa_id", default)]
  pub group_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParishAssignment {
  #[serde(rename = "parafia_id", default)]
  pub parish_id: Option<i64>,
}

// ─── Reference records ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGroup {
  #[serde(rename = "nazwa", default)]
  pub name:        String,
  #[serde(rename = "animator_id", default)]
  pub animator_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewParish {
  /// Dedication, e.g. "św. Floriana".
  #[serde(rename = "wezwanie", default)]
  pub invocation: String,
  #[serde(rename = "adres", default)]
  pub address:    Option<AddressInput>,
  #[serde(default)]
  pub email:      Option<String>,
  #[serde(rename = "telefon", default)]
  pub phone:      Option<String>,
}

impl NewParish {
  pub fn validate(&self) -> Result<()> {
    require("wezwanie", &self.invocation)?;
    check_email(&self.email)?;
    if let Some(a) = &self.address {
      a.validate()?;
    }
    Ok(())
  }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of a create-or-update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saved {
  pub id:      i64,
  /// `false` when an existing row was updated or replaced.
  pub created: bool,
}

/// Result of saving a parent. `username` is the parent's login, generated
/// when the account was provisioned by this save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedParent {
  pub parent_id:  i64,
  pub account_id: i64,
  pub username:   String,
  pub created:    bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parent_requires_both_names() {
    let input = ParentInput { given_name: "Anna".into(), ..Default::default() };
    let err = input.validate().unwrap_err();
    assert_eq!(err.to_string(), "nazwisko is required");
  }

  #[test]
  fn parent_from_form_fields() {
    let input: ParentInput = serde_json::from_str(
      r#"{"imie":"Anna","nazwisko":"Kowalska","telefon":"600100200"}"#,
    )
    .unwrap();
    assert_eq!(input.given_name, "Anna");
    assert_eq!(input.phone, Some(Some("600100200".into())));
    assert_eq!(input.email, None);
    assert!(input.validate().is_ok());
  }

  #[test]
  fn contact_fields_keep_missing_apart_from_cleared() {
    let input: WitnessInput = serde_json::from_str(
      r#"{"imie":"Piotr","nazwisko":"Nowak","email":null,"telefon":"  "}"#,
    )
    .unwrap();
    assert_eq!(contact_change(&input.email), Some(None));
    assert_eq!(contact_change(&input.phone), Some(None));

    let input: WitnessInput =
      serde_json::from_str(r#"{"imie":"Piotr","nazwisko":"Nowak","email":" p@n.pl "}"#).unwrap();
    assert_eq!(contact_change(&input.email), Some(Some("p@n.pl".into())));
    assert_eq!(contact_change(&input.phone), None);
  }

  #[test]
  fn witness_rejects_bad_email() {
    let input = WitnessInput {
      given_name:  "Piotr".into(),
      family_name: "Nowak".into(),
      email:       Some(Some("nowak.example.com".into())),
      ..Default::default()
    };
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn blank_email_counts_as_absent() {
    assert_eq!(present(&Some("   ".into())), None);
    assert_eq!(present(&Some(" a@b.pl ".into())).as_deref(), Some("a@b.pl"));
  }

  #[test]
  fn school_enrollment_needs_all_fields() {
    let mut input = SchoolEnrollmentInput {
      school_id:   Some(3),
      grade:       "8b".into(),
      school_year: String::new(),
    };
    assert!(input.validate().is_err());
    input.school_year = "2025/2026".into();
    assert_eq!(input.validate().unwrap(), 3);
    input.school_id = None;
    assert!(input.validate().is_err());
  }

  #[test]
  fn confirmation_name_needs_justification() {
    let input = ConfirmationNameInput {
      name:          "Franciszek".into(),
      justification: " ".into(),
    };
    assert_eq!(input.validate().unwrap_err().to_string(), "uzasadnienie is required");
  }
}
