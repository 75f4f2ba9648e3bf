//! Capability tags attached to accounts.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A fixed reference set of roles. The lowercase string form is both the
/// database value and the wire value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Administrator,
  /// Pastor.
  Duszpasterz,
  /// Parish office.
  Kancelaria,
  /// Formation group leader.
  Animator,
  /// Parent or guardian.
  Rodzic,
  /// Confirmation candidate.
  Kandydat,
}

impl Role {
  /// Roles that may act on any account, bypassing ownership checks.
  pub const PRIVILEGED: &'static [Role] =
    &[Role::Administrator, Role::Duszpasterz, Role::Kancelaria];

  pub fn is_privileged(self) -> bool { Self::PRIVILEGED.contains(&self) }
}
