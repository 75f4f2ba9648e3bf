//! Error types for `bierzmowanie-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or malformed. Raised before any write.
  #[error("{0}")]
  Validation(String),

  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: i64 },

  #[error("candidate {0} not found")]
  CandidateNotFound(i64),

  #[error("account {0} not found")]
  AccountNotFound(i64),

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse failure class, used by the HTTP layer to choose a status code
/// without knowing which storage backend produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  Validation,
  NotFound,
  Persistence,
}

/// Implemented by every error type a [`crate::store::ParishStore`] can return.
pub trait Classify {
  fn class(&self) -> ErrorClass;
}

impl Classify for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Self::Validation(_) | Self::UsernameTaken(_) => ErrorClass::Validation,
      Self::NotFound { .. }
      | Self::CandidateNotFound(_)
      | Self::AccountNotFound(_) => ErrorClass::NotFound,
      Self::PasswordHash(_) => ErrorClass::Persistence,
    }
  }
}

impl Classify for std::convert::Infallible {
  fn class(&self) -> ErrorClass { match *self {} }
}
