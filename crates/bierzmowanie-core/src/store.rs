//! The `ParishStore` trait.
//!
//! Implemented by storage backends (e.g. `bierzmowanie-store-sqlite`). The
//! HTTP layer depends on this abstraction, not on any concrete backend, and
//! receives the store by injection at startup.
//!
//! Every mutating method validates its input before touching storage and
//! runs all of its writes in one transaction: on any failure nothing is
//! written.

use std::future::Future;

use crate::{
  Classify, Role,
  account::{Account, Credentials, NewAccount},
  candidate::CandidateView,
  input::{
    ConfirmationNameInput, NewGroup, NewParish, ParentInput, Saved,
    SavedParent, SchoolEnrollmentInput, WitnessInput,
  },
};

/// Abstraction over the registry's storage backend.
///
/// Soft-deleted accounts are invisible to every method.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ParishStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Look up login credentials. An `identifier` containing `@` is matched
  /// against primary email addresses, anything else against usernames.
  fn find_credentials<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  /// Retrieve an account with its current roles. `None` if absent or deleted.
  fn get_account(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Create an account, its role assignments, and optional primary contacts
  /// and address.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Replace an account's role set. The set must not be empty.
  fn set_roles(
    &self,
    id: i64,
    roles: Vec<Role>,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Soft-delete an account. Returns `false` if it was absent or already
  /// deleted.
  fn delete_account(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reference records ─────────────────────────────────────────────────

  fn create_school(
    &self,
    name: String,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// The animator, if given, must hold the `animator` role.
  fn create_group(
    &self,
    input: NewGroup,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn create_parish(
    &self,
    input: NewParish,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Candidate relationships ───────────────────────────────────────────

  /// Create or update the candidate's parent. When the candidate has no
  /// parent yet, a new account with role `rodzic` is provisioned with the
  /// hash returned by `hash_password`, which is called only then.
  ///
  /// If several parents are linked, the one with the lowest id is updated.
  fn save_parent<H>(
    &self,
    candidate_id: i64,
    input: ParentInput,
    hash_password: H,
  ) -> impl Future<Output = Result<SavedParent, Self::Error>> + Send + '_
  where
    H: FnOnce() -> crate::Result<String> + Send + 'static;

  fn save_witness(
    &self,
    candidate_id: i64,
    input: WitnessInput,
  ) -> impl Future<Output = Result<Saved, Self::Error>> + Send + '_;

  fn save_school_enrollment(
    &self,
    candidate_id: i64,
    input: SchoolEnrollmentInput,
  ) -> impl Future<Output = Result<Saved, Self::Error>> + Send + '_;

  fn save_confirmation_name(
    &self,
    candidate_id: i64,
    input: ConfirmationNameInput,
  ) -> impl Future<Output = Result<Saved, Self::Error>> + Send + '_;

  /// Replace the candidate's group membership (last write wins).
  fn assign_group(
    &self,
    candidate_id: i64,
    group_id: i64,
  ) -> impl Future<Output = Result<Saved, Self::Error>> + Send + '_;

  /// Replace an account's parish membership (last write wins).
  fn assign_parish(
    &self,
    account_id: i64,
    parish_id: i64,
  ) -> impl Future<Output = Result<Saved, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Assemble the full candidate view. `None` if `candidate_id` is not a
  /// live account holding the `kandydat` role.
  fn candidate_view(
    &self,
    candidate_id: i64,
  ) -> impl Future<Output = Result<Option<CandidateView>, Self::Error>> + Send + '_;
}
