use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Server-side record backing an issued token; deleting it revokes the token
/// Maps to `auth_sessions` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub async fn create(
        pool: &PgPool,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthSession, sqlx::Error> {
        sqlx::query_as::<_, AuthSession>(
            r#"
            INSERT INTO auth_sessions (session_id, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING session_id, user_id, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Unexpired session owned by `user_id`
    pub async fn find_active(
        pool: &PgPool,
        session_id: Uuid,
        user_id: i32,
    ) -> Result<Option<AuthSession>, sqlx::Error> {
        sqlx::query_as::<_, AuthSession>(
            r#"
            SELECT session_id, user_id, created_at, expires_at
            FROM auth_sessions
            WHERE session_id = $1 AND user_id = $2 AND expires_at > NOW()
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, session_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all_for_user(pool: &PgPool, user_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
