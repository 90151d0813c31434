// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auth and upload backend for the fragview viewer.
//!
//! Endpoints:
//! - `GET  /api/health`        service status
//! - `POST /api/auth/register` create an account, returns a token
//! - `POST /api/auth/login`    exchange credentials for a token
//! - `GET  /api/auth/user`     current user (requires bearer token)
//! - `GET  /uploads/*`         static model files

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod store;

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use config::Config;
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
}

/// Build the application router.
///
/// Kept separate from `main` so integration tests can serve the same
/// router on an ephemeral port.
pub fn app(state: AppState) -> Router {
    let cors = match &state.config.api_url {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(tower_http::cors::Any),
            Err(_) => {
                tracing::warn!(origin, "invalid API_URL origin, allowing any");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    };

    let protected = Router::new()
        .route("/api/auth/user", get(routes::auth::current_user))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
