//! Authentication: argon2 password hashing, JWT bearer tokens, and the
//! `AuthUser` extractor every protected route goes through.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Token lifetime, matching the original service's 1-day sessions.
const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Encoding/decoding key pair derived from the configured secret.
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hash a plaintext password.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issue a bearer token for a user.
pub fn generate_token(user_id: Uuid, role: &str, keys: &JwtKeys) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iat: now,
        exp: now + TOKEN_TTL_SECONDS,
    };
    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("token encoding failed: {e}")))
}

/// Validate a bearer token, returning its claims.
pub fn validate_token(token: &str, keys: &JwtKeys) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// The authenticated caller, extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        let claims = validate_token(token, &state.jwt)?;
        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_roundtrip_carries_claims() {
        let keys = JwtKeys::from_secret("test-secret");
        let uid = Uuid::new_v4();
        let token = generate_token(uid, "admin", &keys).unwrap();
        let claims = validate_token(&token, &keys).unwrap();
        assert_eq!(claims.sub, uid);
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let keys = JwtKeys::from_secret("secret-a");
        let other = JwtKeys::from_secret("secret-b");
        let token = generate_token(Uuid::new_v4(), "user", &keys).unwrap();
        assert!(matches!(
            validate_token(&token, &other),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let keys = JwtKeys::from_secret("secret");
        assert!(validate_token("not-a-jwt", &keys).is_err());
    }
}
