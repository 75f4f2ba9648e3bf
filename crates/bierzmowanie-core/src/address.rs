//! Postal addresses shared by accounts, parents, witnesses and parishes.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, input::require};

/// An address as submitted by a form. Streets are referenced by id; the
/// street in turn belongs to a city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddressInput {
  #[serde(rename = "ulica_id", default)]
  pub street_id:       Option<i64>,
  #[serde(rename = "numer_domu", default)]
  pub building_number: String,
  #[serde(rename = "numer_mieszkania", default)]
  pub unit_number:     Option<String>,
  #[serde(rename = "kod_pocztowy", default)]
  pub postal_code:     String,
}

impl AddressInput {
  pub fn validate(&self) -> Result<()> {
    require("numer_domu", &self.building_number)?;
    let code = require("kod_pocztowy", &self.postal_code)?;
    if !is_postal_code(code) {
      return Err(Error::validation(format!(
        "kod_pocztowy must look like 00-000, got {code:?}"
      )));
    }
    Ok(())
  }
}

/// Polish postal codes are `NN-NNN`.
fn is_postal_code(s: &str) -> bool {
  let b = s.as_bytes();
  b.len() == 6
    && b[2] == b'-'
    && b.iter().enumerate().all(|(i, c)| i == 2 || c.is_ascii_digit())
}

/// A resolved address with street and city names joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
  pub id:              i64,
  pub street:          Option<String>,
  pub city:            Option<String>,
  pub building_number: String,
  pub unit_number:     Option<String>,
  pub postal_code:     String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn address(code: &str) -> AddressInput {
    AddressInput {
      street_id:       Some(1),
      building_number: "12".into(),
      unit_number:     None,
      postal_code:     code.into(),
    }
  }

  #[test]
  fn accepts_polish_postal_code() {
    assert!(address("30-001").validate().is_ok());
  }

  #[test]
  fn rejects_malformed_postal_code() {
    assert!(matches!(address("30001").validate(), Err(Error::Validation(_))));
    assert!(matches!(address("3a-001").validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn building_number_is_required() {
    let mut a = address("30-001");
    a.building_number = "  ".into();
    assert!(matches!(a.validate(), Err(Error::Validation(_))));
  }
}
