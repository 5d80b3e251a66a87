//! # Database Module
//!
//! Persistence for the users table. One row per Telegram user, keyed
//! by the user's own id; the write path is fire-and-forget and no
//! handler reads this table back.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Language tag stored for new users
pub const DEFAULT_LANGUAGE: &str = "ru";

/// A user row as stored in the database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub language: String,
    pub created_at: NaiveDateTime,
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            username TEXT,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            language TEXT NOT NULL DEFAULT 'ru',
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Insert or update a user record keyed by the user's id
pub async fn upsert_user(
    pool: &SqlitePool,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    debug!(user_id, "Recording user interaction");

    sqlx::query(
        "INSERT INTO users (user_id, username, first_name, last_name)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             username = excluded.username,
             first_name = excluded.first_name,
             last_name = excluded.last_name",
    )
    .bind(user_id)
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .execute(pool)
    .await
    .context("Failed to upsert user")?;

    Ok(())
}

/// Read a user row by id
pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT user_id, username, first_name, last_name, language, created_at
         FROM users WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read user")?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> Result<SqlitePool> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        init_database_schema(&pool).await?;
        Ok(pool)
    }

    #[tokio::test]
    async fn test_upsert_user_creates_row() -> Result<()> {
        let pool = setup_test_db().await?;

        upsert_user(&pool, 12345, Some("reader"), "Иван", "Петров").await?;

        let user = get_user(&pool, 12345).await?.expect("user should exist");
        assert_eq!(user.user_id, 12345);
        assert_eq!(user.username.as_deref(), Some("reader"));
        assert_eq!(user.first_name, "Иван");
        assert_eq!(user.last_name, "Петров");
        assert_eq!(user.language, DEFAULT_LANGUAGE);

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_user_updates_existing_row() -> Result<()> {
        let pool = setup_test_db().await?;

        upsert_user(&pool, 12345, Some("reader"), "Иван", "").await?;
        upsert_user(&pool, 12345, None, "Ivan", "Petrov").await?;

        let user = get_user(&pool, 12345).await?.expect("user should exist");
        assert_eq!(user.username, None);
        assert_eq!(user.first_name, "Ivan");
        assert_eq!(user.last_name, "Petrov");
        assert_eq!(user.language, DEFAULT_LANGUAGE);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_missing_row() -> Result<()> {
        let pool = setup_test_db().await?;

        assert_eq!(get_user(&pool, 999).await?, None);

        Ok(())
    }
}
