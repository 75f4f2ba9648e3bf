//! The access gate: one capability table consulted by every handler.
//!
//! Authorization has two axes. The role axis asks whether any of the
//! caller's roles is allowed to perform the action at all (any one role
//! suffices). The ownership axis applies to actions on a specific account:
//! a caller without a bypassing role may only target their own id.

use bierzmowanie_core::{Role, account::Identity};

use crate::error::ApiError;

/// Everything a handler can ask the gate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  SaveParent,
  SaveWitness,
  SaveSchool,
  SaveConfirmationName,
  AssignGroup,
  AssignParish,
  ViewCandidate,
  RegisterCandidate,
  ManageReferenceData,
  SetRoles,
  DeleteAccount,
}

const ALL: &[Role] = &[
  Role::Administrator,
  Role::Duszpasterz,
  Role::Kancelaria,
  Role::Animator,
  Role::Rodzic,
  Role::Kandydat,
];

const PRIVILEGED_AND_CANDIDATE: &[Role] =
  &[Role::Administrator, Role::Duszpasterz, Role::Kancelaria, Role::Kandydat];

const GROUP_MANAGERS: &[Role] =
  &[Role::Administrator, Role::Duszpasterz, Role::Kancelaria, Role::Animator];

// Animators and parents see any candidate until group and parent links are
// checked here.
const VIEW_BYPASS: &[Role] = &[
  Role::Administrator,
  Role::Duszpasterz,
  Role::Kancelaria,
  Role::Animator,
  Role::Rodzic,
];

const ADMIN: &[Role] = &[Role::Administrator];

/// What an action requires.
#[derive(Debug, Clone, Copy)]
pub struct Capability {
  pub allowed:   &'static [Role],
  /// `None` when the action is not about one account. Otherwise the roles
  /// that may target someone else's account.
  pub ownership: Option<&'static [Role]>,
}

impl Action {
  pub fn capability(self) -> Capability {
    use Action::*;
    let (allowed, ownership) = match self {
      SaveParent | SaveWitness | SaveSchool | SaveConfirmationName | AssignParish => {
        (PRIVILEGED_AND_CANDIDATE, Some(Role::PRIVILEGED))
      }
      AssignGroup => (GROUP_MANAGERS, None),
      ViewCandidate => (ALL, Some(VIEW_BYPASS)),
      RegisterCandidate | ManageReferenceData => (Role::PRIVILEGED, None),
      SetRoles | DeleteAccount => (ADMIN, None),
    };
    Capability { allowed, ownership }
  }
}

/// Check `identity` against `action`, targeting account `target` if the
/// action is about one.
pub fn authorize(identity: &Identity, action: Action, target: Option<i64>) -> Result<(), ApiError> {
  require_role(identity, action)?;
  match target {
    Some(target) => require_owner(identity, action, target),
    None => Ok(()),
  }
}

/// The role axis alone. Handlers run it before parsing anything from the
/// request beyond the session.
pub fn require_role(identity: &Identity, action: Action) -> Result<(), ApiError> {
  if identity.has_any_role(action.capability().allowed) {
    Ok(())
  } else {
    tracing::debug!(user = %identity.username, ?action, "role check failed");
    Err(ApiError::Forbidden("insufficient role".into()))
  }
}

/// The ownership axis: `target` must be the caller's own account unless a
/// bypassing role is held.
pub fn require_owner(identity: &Identity, action: Action, target: i64) -> Result<(), ApiError> {
  if let Some(bypass) = action.capability().ownership
    && target != identity.id
    && !identity.has_any_role(bypass)
  {
    tracing::debug!(user = %identity.username, ?action, target, "ownership check failed");
    return Err(ApiError::Forbidden("you may only act on your own account".into()));
  }
  Ok(())
}
