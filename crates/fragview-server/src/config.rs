// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Allowed CORS origin for the viewer frontend.
    pub api_url: Option<String>,
    /// Database connection string.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Token validity period in hours.
    pub token_expiry_hours: i64,
    /// Directory served under /uploads.
    pub upload_dir: String,
    /// bcrypt work factor.
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .unwrap_or(3000),
            api_url: std::env::var("API_URL").ok().filter(|s| !s.is_empty()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".into()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "fragview-dev-secret".into()),
            token_expiry_hours: std::env::var("TOKEN_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()
                .unwrap_or(24),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
