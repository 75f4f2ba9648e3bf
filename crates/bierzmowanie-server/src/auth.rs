//! Session transport: the `auth_token` cookie, the bearer fallback, and the
//! [`Authenticated`] extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bierzmowanie_core::{account::Identity, store::ParishStore};

use crate::{AppState, error::ApiError};

pub const AUTH_COOKIE: &str = "auth_token";

/// The session token from the cookie, or from `Authorization: Bearer` for
/// clients that do not keep cookies.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
  if let Some(cookie) = CookieJar::from_headers(headers).get(AUTH_COOKIE)
    && !cookie.value().is_empty()
  {
    return Some(cookie.value().to_owned());
  }
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
}

pub fn session_cookie(token: String, lifetime_secs: i64, secure: bool) -> Cookie<'static> {
  Cookie::build((AUTH_COOKIE, token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(secure)
    .max_age(time::Duration::seconds(lifetime_secs))
    .build()
}

/// The cookie to hand to [`CookieJar::remove`]; the path must match the one
/// the session cookie was set with.
pub fn expired_cookie() -> Cookie<'static> {
  Cookie::build(AUTH_COOKIE).path("/").build()
}

/// Present in a handler means the request carried a valid, unexpired token.
pub struct Authenticated(pub Identity);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: ParishStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = token_from_headers(&parts.headers)
      .ok_or_else(|| ApiError::Unauthenticated("not signed in".into()))?;
    let claims = state.tokens.verify(&token)?;
    Ok(Authenticated(claims.identity()))
  }
}
