//! PostgreSQL repository for the `sessions` table.

use async_trait::async_trait;
use nimba_core::types::DbId;
use sqlx::PgPool;

use super::SessionRepo;
use crate::error::DbError;
use crate::models::session::{CreateSession, Session};

const COLUMNS: &str = "id, user_id, expires_at, revoked_at, created_at";

pub struct PgSessionRepo {
    pool: PgPool,
}

impl PgSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepo for PgSessionRepo {
    async fn create(&self, input: &CreateSession) -> Result<Session, DbError> {
        let query = format!(
            "INSERT INTO sessions (user_id, expires_at) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(input.expires_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_active(&self, id: DbId) -> Result<Option<Session>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE id = $1 AND revoked_at IS NULL AND expires_at > NOW()"
        );
        Ok(sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn revoke(&self, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
