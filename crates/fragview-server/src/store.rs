// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SQLite-backed user store.

use crate::error::ApiError;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

/// A stored user account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// Open a connection pool and create the schema if missing.
///
/// In-memory SQLite databases are per-connection, so the pool is capped
/// at a single connection to keep every query on the same database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, ApiError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a new user and return the stored row.
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    phone: &str,
    password_hash: &str,
) -> Result<User, ApiError> {
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password_hash: password_hash.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO users (id, username, email, phone, password_hash, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&user.password_hash)
    .bind(&user.created_at)
    .execute(pool)
    .await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inserts_and_finds_users() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let user = insert_user(&pool, "alice", "alice@example.com", "555-0100", "hash")
            .await
            .unwrap();

        let by_email = find_user_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.username, "alice");

        let by_id = find_user_by_id(&pool, &user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let pool = connect("sqlite::memory:").await.unwrap();
        assert!(find_user_by_email(&pool, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
        assert!(find_user_by_id(&pool, "no-such-id").await.unwrap().is_none());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: "u1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone: "555-0100".into(),
            password_hash: "secret-hash".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
