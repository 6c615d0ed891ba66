// src/services/auth_service.rs

//! Password hashing/verification and bearer-token issuance. Tokens are
//! self-contained HS256 JWTs; there is no server-side session store, so a
//! token stays valid until its expiry or until the signing secret changes.

use crate::errors::AppError;
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    SaltString,
  },
  Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

/// Rejection message shared by every token-verification failure path.
pub const NOT_AUTHORIZED: &str = "Not Authorized. Login Again";

const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// The three principal namespaces. A token minted for one role is never
/// accepted on another role's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Instructor,
  Admin,
}

/// JWT claims. `sub` holds the principal id; the admin principal has no
/// store record, so its `sub` is the fixed string "admin".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: String,
  pub role: Role,
  pub iat: i64,
  pub exp: i64,
}

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty for hashing.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default();

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => Ok(password_hash_obj.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on a mismatch; errors are reserved for malformed
/// stored hashes and internal verifier failures.
#[instrument(name = "auth_service::verify_password", skip(hashed_password_str, provided_password), err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if hashed_password_str.is_empty() || provided_password.is_empty() {
    return Err(AppError::Auth("Password verification input cannot be empty.".to_string()));
  }

  let parsed_hash = match PasswordHash::new(hashed_password_str) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!(
        "Invalid stored password hash format: {}",
        parse_err
      )));
    }
  };

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Issues a signed bearer token binding `sub` to `role`.
#[instrument(name = "auth_service::issue_token", skip(secret), fields(%sub, ?role))]
pub fn issue_token(secret: &str, sub: &str, role: Role) -> Result<String, AppError> {
  let iat = Utc::now().timestamp();
  let claims = Claims {
    sub: sub.to_string(),
    role,
    iat,
    exp: iat + TOKEN_TTL_SECS,
  };

  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("Token issuance failed: {}", e)))
}

/// Verifies signature, expiry and role namespace; returns the claims.
#[instrument(name = "auth_service::verify_token", skip(secret, token), fields(?expected_role))]
pub fn verify_token(secret: &str, token: &str, expected_role: Role) -> Result<Claims, AppError> {
  let decoded = decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::new(Algorithm::HS256),
  )
  .map_err(|e| {
    warn!(error = %e, "Bearer token rejected.");
    AppError::Auth(NOT_AUTHORIZED.to_string())
  })?;

  if decoded.claims.role != expected_role {
    warn!(token_role = ?decoded.claims.role, "Token presented outside its role namespace.");
    return Err(AppError::Auth(NOT_AUTHORIZED.to_string()));
  }

  Ok(decoded.claims)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_roundtrip() {
    let hash = hash_password("skydive-rocks").unwrap();
    assert!(verify_password(&hash, "skydive-rocks").unwrap());
    assert!(!verify_password(&hash, "wrong-password").unwrap());
  }

  #[test]
  fn empty_password_is_rejected() {
    assert!(hash_password("").is_err());
  }

  #[test]
  fn token_roundtrip_preserves_claims() {
    let token = issue_token("secret", "some-user-id", Role::User).unwrap();
    let claims = verify_token("secret", &token, Role::User).unwrap();
    assert_eq!(claims.sub, "some-user-id");
    assert_eq!(claims.role, Role::User);
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn token_is_bound_to_its_role_namespace() {
    let token = issue_token("secret", "some-user-id", Role::User).unwrap();
    assert!(verify_token("secret", &token, Role::Instructor).is_err());
    assert!(verify_token("secret", &token, Role::Admin).is_err());
  }

  #[test]
  fn token_signed_with_other_secret_is_rejected() {
    let token = issue_token("secret-a", "some-user-id", Role::Admin).unwrap();
    assert!(verify_token("secret-b", &token, Role::Admin).is_err());
  }
}
