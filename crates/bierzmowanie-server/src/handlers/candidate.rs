//! Handlers for `/candidate` endpoints.
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | `POST` | `/candidate` | `RegisterCandidate`, 201 |
//! | `GET`  | `/candidate/{id}` | `ViewCandidate` |
//! | `POST` | `/candidate/{id}/parent` | `SaveParent` |
//! | `POST` | `/candidate/{id}/witness` | `SaveWitness` |
//! | `POST` | `/candidate/{id}/school` | `SaveSchool` |
//! | `POST` | `/candidate/{id}/confirmation-name` | `SaveConfirmationName` |
//! | `POST` | `/candidate/{id}/group` | `AssignGroup` |
//! | `POST` | `/candidate/{id}/parish` | `AssignParish` |

use axum::{Json, extract::State, http::StatusCode};
use bierzmowanie_core::{
  Error as CoreError, Role,
  account::{Account, NewAccount},
  address::AddressInput,
  candidate::CandidateView,
  credential::{generate_password, hash_password},
  input::{
    ConfirmationNameInput, GroupAssignment, ParentInput, ParishAssignment,
    Saved, SavedParent, SchoolEnrollmentInput, WitnessInput, require,
  },
  store::ParishStore,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  gate::{Action, authorize},
  handlers::{Body, Id, Success, ok, target},
};

type Reply<T> = Result<Json<Success<T>>, ApiError>;

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RegisterCandidate {
  #[serde(default)]
  pub username:    String,
  #[serde(default)]
  pub password:    String,
  #[serde(rename = "imie", default)]
  pub given_name:  String,
  #[serde(rename = "nazwisko", default)]
  pub family_name: String,
  #[serde(rename = "data_urodzenia", default)]
  pub birth_date:  Option<NaiveDate>,
  #[serde(default)]
  pub email:       Option<String>,
  #[serde(rename = "telefon", default)]
  pub phone:       Option<String>,
  #[serde(rename = "adres", default)]
  pub address:     Option<AddressInput>,
}

#[derive(Debug, Serialize)]
pub struct AccountBody {
  pub account: Account,
}

/// `POST /candidate`
pub async fn register<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  body: Body<RegisterCandidate>,
) -> Result<(StatusCode, Json<Success<AccountBody>>), ApiError> {
  authorize(&user, Action::RegisterCandidate, None)?;
  let Json(body) = body?;
  require("password", &body.password).map_err(|e| state.fail(e))?;

  let input = NewAccount {
    username:      body.username.trim().to_owned(),
    password_hash: hash_password(&body.password).map_err(|e| state.fail(e))?,
    given_name:    body.given_name,
    family_name:   body.family_name,
    birth_date:    body.birth_date,
    roles:         vec![Role::Kandydat],
    email:         body.email,
    phone:         body.phone,
    address:       body.address,
  };
  let account = state
    .store
    .create_account(input)
    .await
    .map_err(|e| state.fail(e))?;

  tracing::info!(by = %user.username, candidate = %account.username, "candidate registered");
  Ok((StatusCode::CREATED, ok(AccountBody { account })))
}

// ─── View ────────────────────────────────────────────────────────────────────

/// `GET /candidate/{id}`
pub async fn view<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
) -> Reply<CandidateView> {
  let id = target(&user, Action::ViewCandidate, id)?;
  let view = state
    .store
    .candidate_view(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| state.fail(CoreError::CandidateNotFound(id)))?;
  Ok(ok(view))
}

// ─── Parent ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentSaved {
  #[serde(flatten)]
  pub parent:           SavedParent,
  /// Handed out once, when the parent's account is provisioned.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub initial_password: Option<String>,
}

/// `POST /candidate/{id}/parent`
pub async fn save_parent<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<ParentInput>,
) -> Reply<ParentSaved> {
  let id = target(&user, Action::SaveParent, id)?;
  let Json(body) = body?;

  // Hashed and handed out only if this save provisions the parent's account.
  let password = generate_password();
  let plaintext = password.clone();

  let parent = state
    .store
    .save_parent(id, body, move || hash_password(&plaintext))
    .await
    .map_err(|e| state.fail(e))?;

  let initial_password = if parent.created {
    tracing::info!(candidate = id, username = %parent.username, "parent account provisioned");
    Some(password)
  } else {
    None
  };
  Ok(ok(ParentSaved { parent, initial_password }))
}

// ─── Witness, school, confirmation name ──────────────────────────────────────

/// `POST /candidate/{id}/witness`
pub async fn save_witness<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<WitnessInput>,
) -> Reply<Saved> {
  let id = target(&user, Action::SaveWitness, id)?;
  let Json(body) = body?;
  let saved = state
    .store
    .save_witness(id, body)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(ok(saved))
}

/// `POST /candidate/{id}/school`
pub async fn save_school<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<SchoolEnrollmentInput>,
) -> Reply<Saved> {
  let id = target(&user, Action::SaveSchool, id)?;
  let Json(body) = body?;
  let saved = state
    .store
    .save_school_enrollment(id, body)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(ok(saved))
}

/// `POST /candidate/{id}/confirmation-name`
pub async fn save_confirmation_name<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<ConfirmationNameInput>,
) -> Reply<Saved> {
  let id = target(&user, Action::SaveConfirmationName, id)?;
  let Json(body) = body?;
  let saved = state
    .store
    .save_confirmation_name(id, body)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(ok(saved))
}

// ─── Memberships ─────────────────────────────────────────────────────────────

/// `POST /candidate/{id}/group` body: `{"grupa_id": 3}`
pub async fn assign_group<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<GroupAssignment>,
) -> Reply<Saved> {
  let id = target(&user, Action::AssignGroup, id)?;
  let Json(body) = body?;
  let group_id = body
    .group_id
    .ok_or_else(|| ApiError::Validation("grupa_id is required".into()))?;
  let saved = state
    .store
    .assign_group(id, group_id)
    .await
    .map_err(|e| state.fail(e))?;
  tracing::info!(by = %user.username, candidate = id, group_id, "group assigned");
  Ok(ok(saved))
}

/// `POST /candidate/{id}/parish` body: `{"parafia_id": 1}`
pub async fn assign_parish<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  id: Id,
  body: Body<ParishAssignment>,
) -> Reply<Saved> {
  let id = target(&user, Action::AssignParish, id)?;
  let Json(body) = body?;
  let parish_id = body
    .parish_id
    .ok_or_else(|| ApiError::Validation("parafia_id is required".into()))?;
  let saved = state
    .store
    .assign_parish(id, parish_id)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(ok(saved))
}
