//! Accounts: the identity records every person in the registry hangs off.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, Role, address::AddressInput, input::require};

/// A non-deleted account with its resolved role set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  pub id:          i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub birth_date:  Option<NaiveDate>,
  pub created_at:  DateTime<Utc>,
  pub roles:       Vec<Role>,
}

impl Account {
  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }
}

/// The part of an account carried in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub id:          i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub roles:       Vec<Role>,
}

impl Identity {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.given_name, self.family_name)
  }

  pub fn has_any_role(&self, roles: &[Role]) -> bool {
    self.roles.iter().any(|r| roles.contains(r))
  }
}

impl From<&Account> for Identity {
  fn from(a: &Account) -> Self {
    Self {
      id:          a.id,
      username:    a.username.clone(),
      given_name:  a.given_name.clone(),
      family_name: a.family_name.clone(),
      roles:       a.roles.clone(),
    }
  }
}

/// What the store hands back for a login lookup. Never serialised.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub account_id:    i64,
  pub username:      String,
  pub password_hash: String,
}

/// Input to [`crate::store::ParishStore::create_account`].
/// `password_hash` is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub username:      String,
  pub password_hash: String,
  pub given_name:    String,
  pub family_name:   String,
  pub birth_date:    Option<NaiveDate>,
  pub roles:         Vec<Role>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub address:       Option<AddressInput>,
}

impl NewAccount {
  pub fn validate(&self) -> Result<()> {
    require("username", &self.username)?;
    require("imie", &self.given_name)?;
    require("nazwisko", &self.family_name)?;
    if self.username.contains('@') {
      return Err(Error::validation("username must not contain '@'"));
    }
    if self.roles.is_empty() {
      return Err(Error::validation("an account needs at least one role"));
    }
    if let Some(address) = &self.address {
      address.validate()?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_account() -> NewAccount {
    NewAccount {
      username:      "jan.kowalski".into(),
      password_hash: "x".into(),
      given_name:    "Jan".into(),
      family_name:   "Kowalski".into(),
      birth_date:    None,
      roles:         vec![Role::Kandydat],
      email:         None,
      phone:         None,
      address:       None,
    }
  }

  #[test]
  fn valid_account_passes() { assert!(new_account().validate().is_ok()); }

  #[test]
  fn account_without_roles_is_rejected() {
    let mut a = new_account();
    a.roles.clear();
    assert!(matches!(a.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn username_cannot_look_like_email() {
    let mut a = new_account();
    a.username = "jan@example.com".into();
    assert!(matches!(a.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn identity_display_name() {
    let id = Identity {
      id:          1,
      username:    "jan".into(),
      given_name:  "Jan".into(),
      family_name: "Kowalski".into(),
      roles:       vec![Role::Kandydat, Role::Animator],
    };
    assert_eq!(id.display_name(), "Jan Kowalski");
    assert!(id.has_any_role(&[Role::Animator, Role::Administrator]));
    assert!(!id.has_any_role(Role::PRIVILEGED));
  }
}
