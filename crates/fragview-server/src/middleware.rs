// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bearer-token authentication middleware.

use crate::auth;
use crate::error::ApiError;
use crate::store;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Resolve the `Authorization: Bearer` token to a user and stash it in
/// request extensions for the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request).ok_or(ApiError::MissingToken)?;
    let claims = auth::verify_token(&state.config, &token)?;

    let user = store::find_user_by_id(&state.pool, &claims.sub)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request {
        Request::builder()
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        let request = request_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_non_bearer_schemes() {
        let request = request_with_auth("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&request).is_none());
    }

    #[test]
    fn rejects_empty_token() {
        let request = request_with_auth("Bearer ");
        assert!(bearer_token(&request).is_none());
    }

    #[test]
    fn missing_header_yields_none() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(bearer_token(&request).is_none());
    }
}
