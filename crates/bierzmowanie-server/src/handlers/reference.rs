//! Reference records the relationship saves point at: schools, formation
//! groups and parishes.

use axum::{Json, extract::State, http::StatusCode};
use bierzmowanie_core::{
  input::{NewGroup, NewParish},
  store::ParishStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  gate::{Action, authorize},
  handlers::{Body, Created, Success, ok},
};

type Reply = Result<(StatusCode, Json<Success<Created>>), ApiError>;

#[derive(Debug, Deserialize)]
pub struct NewSchool {
  #[serde(rename = "nazwa", default)]
  pub name: String,
}

/// `POST /school` body: `{"nazwa": "SP nr 8"}`
pub async fn create_school<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  body: Body<NewSchool>,
) -> Reply {
  authorize(&user, Action::ManageReferenceData, None)?;
  let Json(body) = body?;
  let id = state
    .store
    .create_school(body.name)
    .await
    .map_err(|e| state.fail(e))?;
  Ok((StatusCode::CREATED, ok(Created { id })))
}

/// `POST /group` body: `{"nazwa": "Grupa 1", "animator_id": 5}`
pub async fn create_group<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  body: Body<NewGroup>,
) -> Reply {
  authorize(&user, Action::ManageReferenceData, None)?;
  let Json(body) = body?;
  let id = state
    .store
    .create_group(body)
    .await
    .map_err(|e| state.fail(e))?;
  Ok((StatusCode::CREATED, ok(Created { id })))
}

/// `POST /parish` body: `{"wezwanie": "św. Floriana", "adres": {...}}`
pub async fn create_parish<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  body: Body<NewParish>,
) -> Reply {
  authorize(&user, Action::ManageReferenceData, None)?;
  let Json(body) = body?;
  let id = state
    .store
    .create_parish(body)
    .await
    .map_err(|e| state.fail(e))?;
  Ok((StatusCode::CREATED, ok(Created { id })))
}
