//! PostgreSQL repository for the `advertisements` table.

use async_trait::async_trait;
use nimba_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::AdvertisementRepo;
use crate::error::DbError;
use crate::models::advertisement::{Advertisement, CreateAdvertisement, UpdateAdvertisement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, image_path, link, position, author_id, \
                       starts_at, ends_at, is_active, click_count, created_at";

/// Default listing order: newest first.
const ORDER: &str = "ORDER BY created_at DESC, id DESC";

pub struct PgAdvertisementRepo {
    pool: PgPool,
}

impl PgAdvertisementRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdvertisementRepo for PgAdvertisementRepo {
    async fn create(&self, input: &CreateAdvertisement) -> Result<Advertisement, DbError> {
        let query = format!(
            "INSERT INTO advertisements
                (title, description, image_path, link, position, author_id, starts_at, ends_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_path)
            .bind(&input.link)
            .bind(&input.position)
            .bind(input.author_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Advertisement>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM advertisements WHERE id = $1");
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_owned(
        &self,
        id: DbId,
        author_id: DbId,
    ) -> Result<Option<Advertisement>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM advertisements WHERE id = $1 AND author_id = $2");
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_valid(
        &self,
        position: &str,
        now: Timestamp,
        limit: Option<i64>,
    ) -> Result<Vec<Advertisement>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM advertisements
             WHERE position = $1
               AND is_active = true
               AND starts_at <= $2
               AND ends_at >= $2
             {ORDER}
             LIMIT $3"
        );
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(position)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_author(&self, author_id: DbId) -> Result<Vec<Advertisement>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM advertisements WHERE author_id = $1 {ORDER}");
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_by_author(&self, author_id: DbId) -> Result<i64, DbError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM advertisements WHERE author_id = $1")
                .bind(author_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateAdvertisement,
    ) -> Result<Option<Advertisement>, DbError> {
        let query = format!(
            "UPDATE advertisements SET
                title = $2,
                description = $3,
                image_path = COALESCE($4, image_path),
                link = $5,
                position = $6,
                starts_at = $7,
                ends_at = $8,
                is_active = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_path)
            .bind(&input.link)
            .bind(&input.position)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_clicks(&self, id: DbId) -> Result<Option<Advertisement>, DbError> {
        let query = format!(
            "UPDATE advertisements SET click_count = click_count + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Advertisement>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
