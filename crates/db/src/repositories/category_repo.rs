//! PostgreSQL repository for the `categories` table.

use async_trait::async_trait;
use nimba_core::types::DbId;
use sqlx::PgPool;

use super::CategoryRepo;
use crate::error::DbError;
use crate::models::category::{Category, CreateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key, description, display_order";

pub struct PgCategoryRepo {
    pool: PgPool,
}

impl PgCategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepo for PgCategoryRepo {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY display_order, key");
        Ok(sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Category>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE key = $1");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_or_create(&self, input: &CreateCategory) -> Result<(Category, bool), DbError> {
        let insert = format!(
            "INSERT INTO categories (key, description, display_order)
             VALUES ($1, $2, $3)
             ON CONFLICT (key) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Category>(&insert)
            .bind(&input.key)
            .bind(&input.description)
            .bind(input.display_order)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(category) = inserted {
            return Ok((category, true));
        }

        let select = format!("SELECT {COLUMNS} FROM categories WHERE key = $1");
        let existing = sqlx::query_as::<_, Category>(&select)
            .bind(&input.key)
            .fetch_one(&self.pool)
            .await?;
        Ok((existing, false))
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
