//! Handlers for `/account` endpoints (administrators only).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `PUT`    | `/account/{id}/roles` | Body: `{"roles": ["animator"]}`; takes effect on next refresh |
//! | `DELETE` | `/account/{id}` | Soft delete; 404 if absent or already deleted |

use axum::{Json, extract::State};
use bierzmowanie_core::{Error as CoreError, Role, store::ParishStore};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  gate::Action,
  handlers::{Body, Id, Success, candidate::AccountBody, ok, target},
};

#[derive(Debug, Deserialize)]
pub struct RolesBody {
  #[serde(default)]
  pub roles: Vec<Role>,
}

/// `PUT /account/{id}/roles`
pub async fn set_roles<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<RolesBody>,
) -> Result<Json<Success<AccountBody>>, ApiError> {
  let id = target(&user, Action::SetRoles, id)?;
  let Json(body) = body?;
  let account = state
    .store
    .set_roles(id, body.roles)
    .await
    .map_err(|e| state.fail(e))?;
  tracing::info!(by = %user.username, account = id, roles = ?account.roles, "roles replaced");
  Ok(ok(AccountBody { account }))
}

/// `DELETE /account/{id}`
pub async fn delete<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
) -> Result<Json<Value>, ApiError> {
  let id = target(&user, Action::DeleteAccount, id)?;
  let deleted = state
    .store
    .delete_account(id)
    .await
    .map_err(|e| state.fail(e))?;
  if !deleted {
    return Err(state.fail(CoreError::AccountNotFound(id)));
  }
  tracing::info!(by = %user.username, account = id, "account deleted");
  Ok(Json(json!({ "success": true })))
}
