use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use medibook_common::Notification;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub notifications: Json<Vec<Notification>>,
    pub seen_notifications: Json<Vec<Notification>>,
    pub created_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "user_id, full_name, email, password_hash, role, \
     notifications, seen_notifications, created_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        full_name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO users (user_id, full_name, email, password_hash, role)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .execute(pool)
        .await
        .context("Failed to create user")?;
        Ok(())
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by email")?;
        Ok(row)
    }

    /// Role lookup used by the admin directory. Oldest account wins if the
    /// singleton invariant is ever violated.
    pub async fn find_by_role(pool: &PgPool, role: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at LIMIT 1"
        ))
        .bind(role)
        .fetch_optional(pool)
        .await
        .context("Failed to find user by role")?;
        Ok(row)
    }

    /// Write back both mailbox partitions as whole documents. Callers read
    /// the row, mutate the arrays in memory, and persist here.
    pub async fn set_mailbox(
        pool: &PgPool,
        user_id: Uuid,
        notifications: &[Notification],
        seen_notifications: &[Notification],
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE users SET notifications = $2, seen_notifications = $3 WHERE user_id = $1"#,
        )
        .bind(user_id)
        .bind(Json(notifications))
        .bind(Json(seen_notifications))
        .execute(pool)
        .await
        .context("Failed to update user mailbox")?;
        Ok(())
    }
}
