//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, and roles by their lowercase name.

use std::str::FromStr;

use bierzmowanie_core::{
  Role, account::Account, address::AddressView, candidate::CandidateProfile,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn decode_role(s: &str) -> Result<Role> {
  Role::from_str(s).map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from an `accounts` row plus its role names.
pub struct RawAccount {
  pub id:          i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub birth_date:  Option<String>,
  pub created_at:  String,
  pub roles:       Vec<String>,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:          self.id,
      username:    self.username,
      given_name:  self.given_name,
      family_name: self.family_name,
      birth_date:  self.birth_date.as_deref().map(decode_date).transpose()?,
      created_at:  decode_dt(&self.created_at)?,
      roles:       self
        .roles
        .iter()
        .map(|r| decode_role(r))
        .collect::<Result<_>>()?,
    })
  }
}

/// Raw values for a candidate's base profile.
pub struct RawProfile {
  pub id:          i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub birth_date:  Option<String>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub address:     Option<AddressView>,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<CandidateProfile> {
    Ok(CandidateProfile {
      id:          self.id,
      username:    self.username,
      given_name:  self.given_name,
      family_name: self.family_name,
      birth_date:  self.birth_date.as_deref().map(decode_date).transpose()?,
      email:       self.email,
      phone:       self.phone,
      address:     self.address,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_round_trip() {
    let d = NaiveDate::from_ymd_opt(2010, 5, 17).unwrap();
    assert_eq!(encode_date(d), "2010-05-17");
    assert_eq!(decode_date("2010-05-17").unwrap(), d);
  }

  #[test]
  fn bad_values_are_decode_errors() {
    assert!(matches!(decode_date("17.05.2010"), Err(Error::Decode(_))));
    assert!(matches!(decode_dt("yesterday"), Err(Error::Decode(_))));
    assert!(matches!(decode_role("organista"), Err(Error::Decode(_))));
  }
}
