// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JWT issuance/validation and password hashing.

use crate::config::Config;
use crate::error::ApiError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token issuer name embedded in every JWT.
const ISSUER: &str = "fragview-server";

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token issuer
    pub iss: String,
}

/// Issue a signed token for a user.
///
/// Tokens stay valid until `exp`; there is no server-side revocation.
pub fn issue_token(config: &Config, user_id: &str, email: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + Duration::hours(config.token_expiry_hours)).timestamp(),
        iat: now.timestamp(),
        iss: ISSUER.to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Decode and validate a token, returning its claims.
pub fn verify_token(config: &Config, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::InvalidToken)
}

/// Hash a password with bcrypt.
pub fn hash_password(config: &Config, password: &str) -> Result<String, ApiError> {
    Ok(bcrypt::hash(password, config.bcrypt_cost)?)
}

/// Check a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    Ok(bcrypt::verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 0,
            api_url: None,
            database_url: "sqlite::memory:".into(),
            jwt_secret: "test-secret".into(),
            token_expiry_hours: 1,
            upload_dir: "uploads".into(),
            bcrypt_cost: 4, // minimum cost, tests only
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let config = test_config();
        let token = issue_token(&config, "user-1", "a@b.c").unwrap();
        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.iss, ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config();
        assert!(matches!(
            verify_token(&config, "not.a.token"),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.jwt_secret = "different".into();
        let token = issue_token(&other, "user-1", "a@b.c").unwrap();
        assert!(verify_token(&config, &token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let config = test_config();
        let hash = hash_password(&config, "hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }
}
