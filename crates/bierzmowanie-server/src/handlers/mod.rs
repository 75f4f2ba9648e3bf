pub mod account;
pub mod candidate;
pub mod reference;
pub mod session;

use axum::{
  Json,
  extract::{
    Path,
    rejection::{JsonRejection, PathRejection},
  },
};
use bierzmowanie_core::account::Identity;
use serde::Serialize;

use crate::{
  error::ApiError,
  gate::{Action, require_owner, require_role},
};

/// A JSON body. Its rejection is turned into an [`ApiError`] only after the
/// gate has run, so a caller without the role sees 403 whatever they sent.
pub type Body<T> = Result<Json<T>, JsonRejection>;

/// The `{id}` path segment, held back the same way as [`Body`].
pub type Id = Result<Path<i64>, PathRejection>;

/// Gate an action on one account: role, then the id, then ownership of it.
pub(crate) fn target(user: &Identity, action: Action, id: Id) -> Result<i64, ApiError> {
  require_role(user, action)?;
  let Path(id) = id?;
  require_owner(user, action, id)?;
  Ok(id)
}

/// A successful JSON response: `{"success": true, ...fields of T}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
  pub success: bool,
  #[serde(flatten)]
  pub data:    T,
}

pub(crate) fn ok<T: Serialize>(data: T) -> Json<Success<T>> {
  Json(Success { success: true, data })
}

/// Payload of a create-one response: `{"success": true, "id": ...}`.
#[derive(Debug, Serialize)]
pub struct Created {
  pub id: i64,
}
