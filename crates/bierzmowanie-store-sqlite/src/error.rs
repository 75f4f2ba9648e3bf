//! Error type for `bierzmowanie-store-sqlite`.

use bierzmowanie_core::{Classify, ErrorClass};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] bierzmowanie_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A column held a value the domain types cannot represent.
  #[error("decode error: {0}")]
  Decode(String),
}

impl Classify for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Self::Core(e) => e.class(),
      _ => ErrorClass::Persistence,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
