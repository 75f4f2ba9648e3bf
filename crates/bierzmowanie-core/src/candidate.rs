//! The candidate aggregate, the computed read model for one candidate.
//!
//! Never stored; assembled on every read from independent lookups. A missing
//! relation is `None`, which serialises as `null` so clients always see the
//! full set of keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::address::AddressView;

/// Base profile of the candidate's own account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
  pub id:          i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub birth_date:  Option<NaiveDate>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub address:     Option<AddressView>,
}

/// A short reference to another account, e.g. a group's animator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
  pub id:          i64,
  pub given_name:  String,
  pub family_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
  pub id:       i64,
  pub name:     String,
  pub animator: Option<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentView {
  pub id:          i64,
  pub account_id:  i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub address:     Option<AddressView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessView {
  pub id:          i64,
  pub given_name:  String,
  pub family_name: String,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub address:     Option<AddressView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationNameView {
  pub name:          String,
  pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolView {
  pub school_id:   i64,
  pub school_name: String,
  pub grade:       String,
  pub school_year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParishView {
  pub id:         i64,
  pub invocation: String,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub address:    Option<AddressView>,
}

/// Everything the registry knows about one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
  pub candidate:         CandidateProfile,
  pub group:             Option<GroupView>,
  pub parent:            Option<ParentView>,
  pub witness:           Option<WitnessView>,
  pub confirmation_name: Option<ConfirmationNameView>,
  pub school:            Option<SchoolView>,
  pub parish:            Option<ParishView>,
}
