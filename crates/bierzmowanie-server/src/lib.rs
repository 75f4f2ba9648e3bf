//! HTTP layer for the parish confirmation registry.
//!
//! Exposes an axum [`Router`] backed by any [`ParishStore`]. Sessions are
//! signed tokens carried in the `auth_token` cookie (or a bearer header);
//! every route past login goes through the access gate in [`gate`].

pub mod auth;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod token;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use bierzmowanie_core::{Classify, credential::CredentialVerifier, store::ParishStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{account, candidate, reference, session};
use token::TokenService;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BIERZMOWANIE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Signs session tokens.
  pub jwt_secret:          String,
  /// Mixed into the legacy password hashes.
  pub password_secret:     String,
  #[serde(default = "default_token_lifetime")]
  pub token_lifetime_secs: i64,
  #[serde(default)]
  pub cookie_secure:       bool,
  /// Put persistence error detail in responses. Off in production.
  #[serde(default)]
  pub expose_error_detail: bool,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_token_lifetime() -> i64 { 24 * 60 * 60 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: ParishStore> {
  pub store:    Arc<S>,
  pub config:   Arc<ServerConfig>,
  pub tokens:   Arc<TokenService>,
  pub verifier: Arc<CredentialVerifier>,
}

impl<S: ParishStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      tokens:   Arc::new(TokenService::new(&config.jwt_secret, config.token_lifetime_secs)),
      verifier: Arc::new(CredentialVerifier::new(config.password_secret.clone())),
      config:   Arc::new(config),
    }
  }

  /// Convert a store or domain error into a response, honouring
  /// `expose_error_detail`.
  pub fn fail<E>(&self, e: E) -> ApiError
  where
    E: std::error::Error + Classify,
  {
    ApiError::classify(e, self.config.expose_error_detail)
  }
}

impl<S: ParishStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      config:   Arc::clone(&self.config),
      tokens:   Arc::clone(&self.tokens),
      verifier: Arc::clone(&self.verifier),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the registry's axum [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ParishStore + 'static,
{
  Router::new()
    // Session
    .route("/auth/login", post(session::login::<S>))
    .route("/auth/session", get(session::session))
    .route("/auth/refresh", post(session::refresh::<S>))
    .route("/auth/logout", post(session::logout))
    // Candidates
    .route("/candidate", post(candidate::register::<S>))
    .route("/candidate/{id}", get(candidate::view::<S>))
    .route("/candidate/{id}/parent", post(candidate::save_parent::<S>))
    .route("/candidate/{id}/witness", post(candidate::save_witness::<S>))
    .route("/candidate/{id}/school", post(candidate::save_school::<S>))
    .route(
      "/candidate/{id}/confirmation-name",
      post(candidate::save_confirmation_name::<S>),
    )
    .route("/candidate/{id}/group", post(candidate::assign_group::<S>))
    .route("/candidate/{id}/parish", post(candidate::assign_parish::<S>))
    // Accounts
    .route("/account/{id}", axum::routing::delete(account::delete::<S>))
    .route("/account/{id}/roles", put(account::set_roles::<S>))
    // Reference data
    .route("/school", post(reference::create_school::<S>))
    .route("/group", post(reference::create_group::<S>))
    .route("/parish", post(reference::create_parish::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
  };
  use bierzmowanie_core::{Role, account::NewAccount, credential::hash_password};
  use bierzmowanie_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  /// sha256("secret"), as stored by the oldest accounts.
  const LEGACY_SECRET_HASH: &str =
    "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(store, ServerConfig {
      host:                "127.0.0.1".to_string(),
      port:                8080,
      store_path:          PathBuf::from(":memory:"),
      jwt_secret:          "test-jwt-secret".to_string(),
      password_secret:     "test-password-secret".to_string(),
      token_lifetime_secs: 86_400,
      cookie_secure:       false,
      expose_error_detail: false,
    })
  }

  async fn add_account(
    state: &AppState<SqliteStore>,
    username: &str,
    email: Option<&str>,
    password_hash: String,
    roles: Vec<Role>,
  ) -> i64 {
    state
      .store
      .create_account(NewAccount {
        username: username.into(),
        password_hash,
        given_name: "Jan".into(),
        family_name: "Kowalski".into(),
        birth_date: None,
        roles,
        email: email.map(Into::into),
        phone: None,
        address: None,
      })
      .await
      .unwrap()
      .id
  }

  async fn add_user(state: &AppState<SqliteStore>, username: &str, roles: Vec<Role>) -> i64 {
    add_account(state, username, None, LEGACY_SECRET_HASH.into(), roles).await
  }

  struct Reply {
    status:  StatusCode,
    headers: HeaderMap,
    body:    Value,
  }

  impl Reply {
    fn set_cookie(&self) -> String {
      self
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
    }

    /// The session token from `Set-Cookie`.
    fn token(&self) -> String {
      let cookie = self.set_cookie();
      let rest = cookie.strip_prefix("auth_token=").expect("auth_token cookie");
      rest.split(';').next().unwrap().to_string()
    }
  }

  async fn send(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::COOKIE, format!("auth_token={token}"));
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let res = router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply { status, headers, body }
  }

  /// Send a body as-is, for requests that are not valid JSON.
  async fn send_raw(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    token:  &str,
    raw:    &'static str,
  ) -> Reply {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::COOKIE, format!("auth_token={token}"))
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(raw))
      .unwrap();
    let res = router(state.clone()).oneshot(req).await.unwrap();

    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply { status, headers, body }
  }

  async fn login(state: &AppState<SqliteStore>, identifier: &str, password: &str) -> Reply {
    send(
      state,
      "POST",
      "/auth/login",
      None,
      Some(json!({ "identifier": identifier, "password": password })),
    )
    .await
  }

  async fn token_for(state: &AppState<SqliteStore>, username: &str) -> String {
    let reply = login(state, username, "secret").await;
    assert_eq!(reply.status, StatusCode::OK, "login {username}: {}", reply.body);
    reply.token()
  }

  // ── Login ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_by_email_with_legacy_hash() {
    let state = make_state().await;
    add_account(
      &state,
      "jan.kowalski",
      Some("jan.kowalski@example.com"),
      LEGACY_SECRET_HASH.into(),
      vec![Role::Kandydat],
    )
    .await;

    let reply = login(&state, "jan.kowalski@example.com", "secret").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["user"]["username"], "jan.kowalski");
    assert_eq!(reply.body["user"]["givenName"], "Jan");
    assert_eq!(reply.body["user"]["roles"], json!(["kandydat"]));

    let cookie = reply.set_cookie();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
  }

  #[tokio::test]
  async fn login_missing_fields_is_400() {
    let state = make_state().await;
    let reply = send(&state, "POST", "/auth/login", None, Some(json!({ "identifier": "x" }))).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["success"], false);
    assert!(reply.body["message"].is_string());
  }

  #[tokio::test]
  async fn malformed_body_is_400_json() {
    let state = make_state().await;
    let res = router(state.clone())
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/auth/login")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from("{not json"))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn login_bad_password_is_401() {
    let state = make_state().await;
    add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let reply = login(&state, "jan.kowalski", "wrong").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["success"], false);

    let reply = login(&state, "nobody", "secret").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
  }

  // ── Session, refresh, logout ────────────────────────────────────────────────

  #[tokio::test]
  async fn session_accepts_bearer_token() {
    let state = make_state().await;
    add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let token = token_for(&state, "jan.kowalski").await;

    let res = router(state.clone())
      .oneshot(
        Request::builder()
          .uri("/auth/session")
          .header(header::AUTHORIZATION, format!("Bearer {token}"))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn refresh_reresolves_roles() {
    let state = make_state().await;
    let admin = add_user(&state, "admin", vec![Role::Administrator]).await;
    let jan = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let admin_token = token_for(&state, "admin").await;
    let jan_token = token_for(&state, "jan.kowalski").await;
    assert_ne!(admin, jan);

    let reply = send(
      &state,
      "PUT",
      &format!("/account/{jan}/roles"),
      Some(&admin_token),
      Some(json!({ "roles": ["kandydat", "animator"] })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    // The old token still carries the old roles.
    let reply = send(&state, "GET", "/auth/session", Some(&jan_token), None).await;
    assert_eq!(reply.body["user"]["roles"], json!(["kandydat"]));

    let reply = send(&state, "POST", "/auth/refresh", Some(&jan_token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["roles"], json!(["animator", "kandydat"]));
    assert!(reply.set_cookie().contains("Max-Age=86400"));
  }

  #[tokio::test]
  async fn refresh_fails_after_delete() {
    let state = make_state().await;
    add_user(&state, "admin", vec![Role::Administrator]).await;
    let jan = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let admin_token = token_for(&state, "admin").await;
    let jan_token = token_for(&state, "jan.kowalski").await;

    let reply = send(&state, "DELETE", &format!("/account/{jan}"), Some(&admin_token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = send(&state, "DELETE", &format!("/account/{jan}"), Some(&admin_token), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&state, "POST", "/auth/refresh", Some(&jan_token), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(login(&state, "jan.kowalski", "secret").await.status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn logout_clears_cookie() {
    let state = make_state().await;
    add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let token = token_for(&state, "jan.kowalski").await;

    let reply = send(&state, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let cookie = reply.set_cookie();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("Max-Age=0"));
  }

  // ── Access gate ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn no_token_is_401() {
    let state = make_state().await;
    let cid = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;

    let reply = send(&state, "GET", &format!("/candidate/{cid}"), None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/parent"),
      Some("garbage"),
      Some(json!({ "imie": "Anna", "nazwisko": "Kowalska" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn wrong_role_is_403() {
    let state = make_state().await;
    let cid = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    add_user(&state, "rodzic", vec![Role::Rodzic]).await;
    let parent_token = token_for(&state, "rodzic").await;
    let candidate_token = token_for(&state, "jan.kowalski").await;

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/witness"),
      Some(&parent_token),
      Some(json!({ "imie": "Piotr", "nazwisko": "Nowak" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body["success"], false);

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/group"),
      Some(&candidate_token),
      Some(json!({ "grupa_id": 1 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&state, "POST", "/school", Some(&candidate_token), Some(json!({ "nazwa": "SP 8" }))).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn role_and_ownership_checked_before_body() {
    let state = make_state().await;
    let cid = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let other = add_user(&state, "ewa.nowak", vec![Role::Kandydat]).await;
    add_user(&state, "rodzic", vec![Role::Rodzic]).await;
    let parent_token = token_for(&state, "rodzic").await;
    let candidate_token = token_for(&state, "jan.kowalski").await;

    let uri = format!("/candidate/{cid}/witness");
    let reply = send_raw(&state, "POST", &uri, &parent_token, "{not json").await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send_raw(&state, "POST", "/candidate/abc/witness", &parent_token, "{}").await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let uri = format!("/candidate/{other}/school");
    let reply = send_raw(&state, "POST", &uri, &candidate_token, "{not json").await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send_raw(&state, "POST", "/school", &candidate_token, "{not json").await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    // Allowed callers still get 400 for a body that does not parse.
    let uri = format!("/candidate/{cid}/witness");
    let reply = send_raw(&state, "POST", &uri, &candidate_token, "{not json").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["success"], false);
  }

  #[tokio::test]
  async fn non_numeric_id_is_400_json() {
    let state = make_state().await;
    add_user(&state, "admin", vec![Role::Administrator]).await;
    let token = token_for(&state, "admin").await;

    let reply = send(&state, "GET", "/candidate/abc", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
      reply.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
      Some("application/json"),
    );
    assert_eq!(reply.body["success"], false);
    assert!(reply.body["message"].as_str().unwrap().contains("abc"));

    let reply = send(&state, "DELETE", "/account/abc", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["success"], false);
  }

  #[tokio::test]
  async fn candidate_cannot_target_another_candidate() {
    let state = make_state().await;
    add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let other = add_user(&state, "ewa.nowak", vec![Role::Kandydat]).await;
    let token = token_for(&state, "jan.kowalski").await;

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{other}/parent"),
      Some(&token),
      Some(json!({ "imie": "Anna", "nazwisko": "Kowalska" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = send(&state, "GET", &format!("/candidate/{other}"), Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    let provisioned = state
      .store
      .find_credentials("rodzic.anna.kowalska")
      .await
      .unwrap();
    assert!(provisioned.is_none());
  }

  // ── Relationship saves ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn candidate_saves_own_parent() {
    let state = make_state().await;
    let cid = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let token = token_for(&state, "jan.kowalski").await;

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/parent"),
      Some(&token),
      Some(json!({ "imie": "Anna", "nazwisko": "Kowalska" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["created"], true);
    assert_eq!(reply.body["username"], "rodzic.anna.kowalska");

    let creds = state
      .store
      .find_credentials("rodzic.anna.kowalska")
      .await
      .unwrap();
    assert!(creds.is_some());

    // The provisioned parent can sign in with the password handed out once.
    let password = reply.body["initialPassword"].as_str().unwrap().to_string();
    let parent_login = login(&state, "rodzic.anna.kowalska", &password).await;
    assert_eq!(parent_login.status, StatusCode::OK);
    assert_eq!(parent_login.body["user"]["roles"], json!(["rodzic"]));

    // Saving again updates in place and hands out nothing.
    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/parent"),
      Some(&token),
      Some(json!({ "imie": "Anna", "nazwisko": "Kowalska", "telefon": "600100200" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["created"], false);
    assert!(reply.body.get("initialPassword").is_none());
  }

  #[tokio::test]
  async fn missing_names_are_400() {
    let state = make_state().await;
    let cid = add_user(&state, "jan.kowalski", vec![Role::Kandydat]).await;
    let token = token_for(&state, "jan.kowalski").await;

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/witness"),
      Some(&token),
      Some(json!({ "imie": "Piotr" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["message"], "nazwisko is required");
  }

  #[tokio::test]
  async fn staff_flow_builds_candidate_view() {
    let state = make_state().await;
    add_user(&state, "kancelaria", vec![Role::Kancelaria]).await;
    let animator = add_user(&state, "animator", vec![Role::Animator]).await;
    let staff = token_for(&state, "kancelaria").await;

    let reply = send(
      &state,
      "POST",
      "/candidate",
      Some(&staff),
      Some(json!({
        "username": "ewa.nowak",
        "password": "haslo123",
        "imie": "Ewa",
        "nazwisko": "Nowak",
        "data_urodzenia": "2010-05-17",
      })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    let cid = reply.body["account"]["id"].as_i64().unwrap();
    assert_eq!(reply.body["account"]["roles"], json!(["kandydat"]));

    let reply = send(&state, "GET", &format!("/candidate/{cid}"), Some(&staff), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["candidate"]["givenName"], "Ewa");
    assert!(reply.body["group"].is_null());
    assert!(reply.body["parent"].is_null());
    assert!(reply.body["witness"].is_null());

    let reply = send(
      &state,
      "POST",
      "/group",
      Some(&staff),
      Some(json!({ "nazwa": "Grupa 1", "animator_id": animator })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let gid = reply.body["id"].as_i64().unwrap();

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/group"),
      Some(&staff),
      Some(json!({ "grupa_id": gid })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/confirmation-name"),
      Some(&staff),
      Some(json!({ "imie": "Franciszek", "uzasadnienie": "patron" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&state, "GET", &format!("/candidate/{cid}"), Some(&staff), None).await;
    assert_eq!(reply.body["group"]["id"], gid);
    assert_eq!(reply.body["group"]["animator"]["id"], animator);
    assert_eq!(reply.body["confirmationName"]["name"], "Franciszek");

    let reply = send(
      &state,
      "POST",
      &format!("/candidate/{cid}/group"),
      Some(&staff),
      Some(json!({ "grupa_id": 999 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unknown_candidate_is_404() {
    let state = make_state().await;
    add_user(&state, "admin", vec![Role::Administrator]).await;
    let token = token_for(&state, "admin").await;

    let reply = send(&state, "GET", "/candidate/4242", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(
      &state,
      "POST",
      "/candidate/4242/witness",
      Some(&token),
      Some(json!({ "imie": "Piotr", "nazwisko": "Nowak" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn new_accounts_use_argon2() {
    let state = make_state().await;
    let hash = hash_password("haslo").unwrap();
    assert!(hash.starts_with("$argon2"));
    add_account(&state, "ks.marek", None, hash, vec![Role::Duszpasterz]).await;
    assert_eq!(login(&state, "ks.marek", "haslo").await.status, StatusCode::OK);
  }
}
