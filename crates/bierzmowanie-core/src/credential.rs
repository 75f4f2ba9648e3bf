//! Password verification across every hashing scheme the registry has used.
//!
//! Older accounts were created under several SHA-256 based schemes, some
//! mixing in a server-wide secret. [`CredentialVerifier::verify`] tries each
//! scheme in [`SCHEMES`] order and accepts the first match. The list is
//! append-only: removing or reordering an entry would lock out accounts
//! created under it. New accounts are hashed with argon2, the last entry.
//!
//! A successful match never rewrites the stored hash.

use std::fmt;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

// ─── Schemes ─────────────────────────────────────────────────────────────────

/// One historical hashing scheme. `h` is hex-encoded SHA-256 and `s` the
/// server secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
  /// `h(p)`
  Plain,
  /// `h(s + p)`
  SecretPrefix,
  /// `h(p + s)`
  SecretSuffix,
  /// `h(s + p + s)`
  SecretBoth,
  /// `h(h(p))`
  Double,
  /// `h(s + h(p))`
  DoubleSecretPrefix,
  /// `h(h(p) + s)`
  DoubleSecretSuffix,
  /// `h(s + h(p) + s)`
  DoubleSecretBoth,
  /// argon2 PHC string, salted per account.
  Argon2,
}

/// Verification order.
pub const SCHEMES: [HashScheme; 9] = [
  HashScheme::Plain,
  HashScheme::SecretPrefix,
  HashScheme::SecretSuffix,
  HashScheme::SecretBoth,
  HashScheme::Double,
  HashScheme::DoubleSecretPrefix,
  HashScheme::DoubleSecretSuffix,
  HashScheme::DoubleSecretBoth,
  HashScheme::Argon2,
];

fn sha256_hex(parts: &[&str]) -> String {
  let mut hasher = Sha256::new();
  for part in parts {
    hasher.update(part.as_bytes());
  }
  hex::encode(hasher.finalize())
}

impl HashScheme {
  /// The stored form of `plaintext` under a SHA-256 scheme. `None` for
  /// argon2, whose output depends on a random salt.
  pub fn legacy_digest(self, plaintext: &str, secret: &str) -> Option<String> {
    let p = plaintext;
    let s = secret;
    let digest = match self {
      Self::Plain => sha256_hex(&[p]),
      Self::SecretPrefix => sha256_hex(&[s, p]),
      Self::SecretSuffix => sha256_hex(&[p, s]),
      Self::SecretBoth => sha256_hex(&[s, p, s]),
      Self::Double => sha256_hex(&[&sha256_hex(&[p])]),
      Self::DoubleSecretPrefix => sha256_hex(&[s, &sha256_hex(&[p])]),
      Self::DoubleSecretSuffix => sha256_hex(&[&sha256_hex(&[p]), s]),
      Self::DoubleSecretBoth => sha256_hex(&[s, &sha256_hex(&[p]), s]),
      Self::Argon2 => return None,
    };
    Some(digest)
  }

  fn matches(self, plaintext: &str, stored: &str, secret: &str) -> bool {
    match self {
      Self::Argon2 => {
        if !stored.starts_with("$argon2") {
          return false;
        }
        PasswordHash::new(stored)
          .map(|parsed| {
            Argon2::default()
              .verify_password(plaintext.as_bytes(), &parsed)
              .is_ok()
          })
          .unwrap_or(false)
      }
      legacy => legacy
        .legacy_digest(plaintext, secret)
        .is_some_and(|d| d.eq_ignore_ascii_case(stored.trim())),
    }
  }
}

// ─── Verifier ────────────────────────────────────────────────────────────────

/// Checks plaintext passwords against stored hashes.
#[derive(Clone)]
pub struct CredentialVerifier {
  secret: String,
}

impl CredentialVerifier {
  pub fn new(secret: impl Into<String>) -> Self {
    Self { secret: secret.into() }
  }

  /// `true` if any scheme in [`SCHEMES`] reproduces `stored`.
  pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
    self.matching_scheme(plaintext, stored).is_some()
  }

  /// The first scheme, in verification order, that matches.
  pub fn matching_scheme(
    &self,
    plaintext: &str,
    stored: &str,
  ) -> Option<HashScheme> {
    SCHEMES
      .into_iter()
      .find(|scheme| scheme.matches(plaintext, stored, &self.secret))
  }
}

impl fmt::Debug for CredentialVerifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CredentialVerifier")
      .field("secret", &"<redacted>")
      .finish()
  }
}

// ─── New passwords ───────────────────────────────────────────────────────────

/// Hash a password for a new account (argon2 PHC string).
pub fn hash_password(plaintext: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plaintext.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// A random password for accounts provisioned on someone's behalf.
pub fn generate_password() -> String {
  let mut bytes = [0u8; 12];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;

  const SECRET: &str = "parafia-secret";

  fn verifier() -> CredentialVerifier { CredentialVerifier::new(SECRET) }

  #[test]
  fn plain_sha256_matches_known_digest() {
    // sha256("secret")
    let stored =
      "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";
    assert!(verifier().verify("secret", stored));
    assert_eq!(
      verifier().matching_scheme("secret", stored),
      Some(HashScheme::Plain)
    );
  }

  #[test]
  fn every_legacy_scheme_verifies() {
    let v = verifier();
    for scheme in SCHEMES.into_iter().filter(|s| *s != HashScheme::Argon2) {
      let stored = scheme.legacy_digest("haslo123", SECRET).unwrap();
      assert!(v.verify("haslo123", &stored), "{scheme:?} did not verify");
      assert_eq!(v.matching_scheme("haslo123", &stored), Some(scheme));
    }
  }

  #[test]
  fn mismatched_password_is_rejected_by_every_scheme() {
    let v = verifier();
    for scheme in SCHEMES.into_iter().filter(|s| *s != HashScheme::Argon2) {
      let stored = scheme.legacy_digest("haslo123", SECRET).unwrap();
      assert!(!v.verify("haslo124", &stored), "{scheme:?} accepted a wrong password");
    }
  }

  #[test]
  fn secret_schemes_depend_on_the_secret() {
    let stored = HashScheme::SecretBoth
      .legacy_digest("haslo123", SECRET)
      .unwrap();
    assert!(!CredentialVerifier::new("other").verify("haslo123", &stored));
  }

  #[test]
  fn uppercase_hex_is_accepted() {
    let stored = HashScheme::Double
      .legacy_digest("haslo123", SECRET)
      .unwrap()
      .to_uppercase();
    assert!(verifier().verify("haslo123", &stored));
  }

  #[test]
  fn argon2_is_tried_last() {
    let stored = hash_password("haslo123").unwrap();
    let v = verifier();
    assert_eq!(v.matching_scheme("haslo123", &stored), Some(HashScheme::Argon2));
    assert!(!v.verify("haslo124", &stored));
  }

  #[test]
  fn garbage_hash_never_matches() {
    assert!(!verifier().verify("", "not-a-hash"));
    assert!(!verifier().verify("x", "$argon2id$broken"));
  }

  #[test]
  fn generated_passwords_differ() {
    let a = generate_password();
    let b = generate_password();
    assert_eq!(a.len(), 24);
    assert_ne!(a, b);
  }
}
