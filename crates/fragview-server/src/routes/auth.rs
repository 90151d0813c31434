// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registration, login and current-user endpoints.

use crate::auth::{hash_password, issue_token, verify_password};
use crate::error::ApiError;
use crate::store::{self, User};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub msg: String,
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_data: User,
}

/// POST /api/auth/register
///
/// Email uniqueness is checked by lookup before insert; a duplicate
/// email is rejected with 409.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    validate_registration(&body)?;

    if store::find_user_by_email(&state.pool, &body.email)
        .await?
        .is_some()
    {
        return Err(ApiError::EmailExists);
    }

    let password_hash = hash_password(&state.config, &body.password)?;
    let user = store::insert_user(
        &state.pool,
        &body.username,
        &body.email,
        &body.phone,
        &password_hash,
    )
    .await?;

    let token = issue_token(&state.config, &user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            msg: "Registration Successful".to_string(),
            token,
            user_id: user.id,
        }),
    )
        .into_response())
}

/// POST /api/auth/login
///
/// An unknown email and a wrong password both map to the same 401 so
/// the response does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = store::find_user_by_email(&state.pool, &body.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = issue_token(&state.config, &user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        msg: "Login successful".to_string(),
        token,
        user_id: user.id,
    }))
}

/// GET /api/auth/user
///
/// The auth middleware has already resolved the token to a user; this
/// just echoes it back without the password hash.
pub async fn current_user(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse { user_data: user })
}

fn validate_registration(body: &RegisterRequest) -> Result<(), ApiError> {
    if body.username.trim().is_empty() {
        return Err(ApiError::Validation("username is required".to_string()));
    }
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    if body.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_body() -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone: "555-0100".into(),
            password: "hunter22".into(),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(validate_registration(&valid_body()).is_ok());
    }

    #[test]
    fn rejects_blank_username() {
        let mut body = valid_body();
        body.username = "  ".into();
        assert!(matches!(
            validate_registration(&body),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn rejects_malformed_email() {
        let mut body = valid_body();
        body.email = "not-an-email".into();
        assert!(validate_registration(&body).is_err());
    }

    #[test]
    fn rejects_short_password() {
        let mut body = valid_body();
        body.password = "abc".into();
        assert!(validate_registration(&body).is_err());
    }
}
