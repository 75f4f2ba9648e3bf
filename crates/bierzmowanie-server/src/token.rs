//! Signed session tokens (HS256 JWTs).
//!
//! A token carries the account id, username, display name parts and the
//! role set resolved at issue time. Refreshing re-reads the roles from the
//! store, so role changes take effect on the next refresh.

use std::fmt;

use bierzmowanie_core::{Role, account::Identity, store::ParishStore};
use chrono::Utc;
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Account id.
  pub sub:         i64,
  pub username:    String,
  pub given_name:  String,
  pub family_name: String,
  pub roles:       Vec<Role>,
  pub iat:         i64,
  pub exp:         i64,
}

impl Claims {
  pub fn identity(&self) -> Identity {
    Identity {
      id:          self.sub,
      username:    self.username.clone(),
      given_name:  self.given_name.clone(),
      family_name: self.family_name.clone(),
      roles:       self.roles.clone(),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
  #[error("session expired")]
  Expired,
  #[error("malformed token")]
  Malformed,
  #[error("invalid token: {0}")]
  Generic(String),
  #[error("account {0} no longer exists")]
  AccountNotFound(i64),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
  fn from(e: jsonwebtoken::errors::Error) -> Self {
    match e.kind() {
      ErrorKind::ExpiredSignature => Self::Expired,
      ErrorKind::InvalidToken
      | ErrorKind::Base64(_)
      | ErrorKind::Json(_)
      | ErrorKind::Utf8(_) => Self::Malformed,
      _ => Self::Generic(e.to_string()),
    }
  }
}

/// Failure of [`TokenService::refresh`]: either the token itself, or the
/// store lookup that re-resolves the account.
#[derive(Debug, Error)]
pub enum RefreshError<E: std::error::Error + 'static> {
  #[error(transparent)]
  Auth(#[from] AuthError),
  #[error("store error: {0}")]
  Store(#[source] E),
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct Issued {
  pub token:  String,
  pub claims: Claims,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct TokenService {
  encoding:      EncodingKey,
  decoding:      DecodingKey,
  lifetime_secs: i64,
}

impl TokenService {
  pub fn new(secret: &str, lifetime_secs: i64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      lifetime_secs,
    }
  }

  pub fn lifetime_secs(&self) -> i64 { self.lifetime_secs }

  pub fn issue(&self, identity: &Identity) -> Result<Issued, AuthError> {
    self.issue_at(identity, Utc::now().timestamp())
  }

  fn issue_at(&self, identity: &Identity, now: i64) -> Result<Issued, AuthError> {
    let claims = Claims {
      sub:         identity.id,
      username:    identity.username.clone(),
      given_name:  identity.given_name.clone(),
      family_name: identity.family_name.clone(),
      roles:       identity.roles.clone(),
      iat:         now,
      exp:         now + self.lifetime_secs,
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|e| AuthError::Generic(e.to_string()))?;
    Ok(Issued { token, claims })
  }

  /// Check signature and expiry.
  pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
  }

  /// Check the signature only; an expired token still decodes.
  fn verify_signature(&self, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    Ok(decode::<Claims>(token, &self.decoding, &validation)?.claims)
  }

  /// Re-issue `token` with a fresh expiry and the account's current roles.
  pub async fn refresh<S: ParishStore>(
    &self,
    token: &str,
    store: &S,
  ) -> Result<Issued, RefreshError<S::Error>> {
    let old = self.verify_signature(token)?;
    let account = store
      .get_account(old.sub)
      .await
      .map_err(RefreshError::Store)?
      .ok_or(AuthError::AccountNotFound(old.sub))?;
    Ok(self.issue(&Identity::from(&account))?)
  }
}

impl fmt::Debug for TokenService {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenService")
      .field("secret", &"<redacted>")
      .field("lifetime_secs", &self.lifetime_secs)
      .finish()
  }
}
