//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Body: `{"identifier": ..., "password": ...}`; sets the cookie |
//! | `GET`  | `/auth/session` | Identity from the current token |
//! | `POST` | `/auth/refresh` | Expired tokens accepted; roles re-read |
//! | `POST` | `/auth/logout` | Clears the cookie |

use axum::{Json, extract::State, http::HeaderMap};
use axum_extra::extract::{CookieJar, WithRejection};
use bierzmowanie_core::{account::Identity, store::ParishStore};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::{Authenticated, expired_cookie, session_cookie, token_from_headers},
  error::ApiError,
  handlers::{Success, ok},
  token::{Issued, RefreshError},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
  /// A username, or an email address if it contains `@`.
  #[serde(default)]
  pub identifier: String,
  #[serde(default)]
  pub password:   String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
  pub user: Identity,
}

fn with_cookie<S: ParishStore>(jar: CookieJar, state: &AppState<S>, issued: Issued) -> CookieJar {
  jar.add(session_cookie(
    issued.token,
    state.tokens.lifetime_secs(),
    state.config.cookie_secure,
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

/// `POST /auth/login`
pub async fn login<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<(CookieJar, Json<Success<SessionUser>>), ApiError> {
  let identifier = body.identifier.trim();
  if identifier.is_empty() || body.password.is_empty() {
    return Err(ApiError::Validation("identifier and password are required".into()));
  }

  let rejected = || {
    tracing::warn!(identifier, "login rejected");
    ApiError::Unauthenticated("invalid credentials".into())
  };

  let creds = state
    .store
    .find_credentials(identifier)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(rejected)?;

  if !state.verifier.verify(&body.password, &creds.password_hash) {
    return Err(rejected());
  }

  let account = state
    .store
    .get_account(creds.account_id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(rejected)?;

  let user = Identity::from(&account);
  let issued = state.tokens.issue(&user)?;
  tracing::info!(username = %user.username, "login");

  Ok((with_cookie(jar, &state, issued), ok(SessionUser { user })))
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// `GET /auth/session`
pub async fn session(Authenticated(user): Authenticated) -> Json<Success<SessionUser>> {
  ok(SessionUser { user })
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

/// `POST /auth/refresh`
pub async fn refresh<S: ParishStore + 'static>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  jar: CookieJar,
) -> Result<(CookieJar, Json<Success<SessionUser>>), ApiError> {
  let token = token_from_headers(&headers)
    .ok_or_else(|| ApiError::Unauthenticated("not signed in".into()))?;

  let issued = match state.tokens.refresh(&token, state.store.as_ref()).await {
    Ok(issued) => issued,
    Err(RefreshError::Auth(e)) => {
      tracing::info!(error = %e, "refresh rejected");
      return Err(e.into());
    }
    Err(RefreshError::Store(e)) => return Err(state.fail(e)),
  };

  let user = issued.claims.identity();
  tracing::info!(username = %user.username, "token refreshed");
  Ok((with_cookie(jar, &state, issued), ok(SessionUser { user })))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `POST /auth/logout`
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
  (jar.remove(expired_cookie()), Json(json!({ "success": true })))
}
