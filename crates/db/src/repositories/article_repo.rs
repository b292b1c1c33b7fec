//! PostgreSQL repository for the `articles` table.

use async_trait::async_trait;
use nimba_core::types::DbId;
use sqlx::PgPool;

use super::ArticleRepo;
use crate::error::DbError;
use crate::models::article::{
    Article, AuthorArticleStats, CreateArticle, PublishedArticleFilter, UpdateArticle,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, subtitle, body, image_path, author_id, category_id, \
                       published_at, updated_at, is_published, is_featured, view_count";

/// Default listing order: newest publication first.
const ORDER: &str = "ORDER BY published_at DESC, id DESC";

pub struct PgArticleRepo {
    pool: PgPool,
}

impl PgArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepo for PgArticleRepo {
    async fn create(&self, input: &CreateArticle) -> Result<Article, DbError> {
        let query = format!(
            "INSERT INTO articles
                (title, subtitle, body, image_path, author_id, category_id, is_published, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.body)
            .bind(&input.image_path)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.is_published)
            .bind(input.is_featured)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_published(&self, id: DbId) -> Result<Option<Article>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1 AND is_published = true");
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_owned(&self, id: DbId, author_id: DbId) -> Result<Option<Article>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1 AND author_id = $2");
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_published(
        &self,
        filter: &PublishedArticleFilter,
    ) -> Result<Vec<Article>, DbError> {
        // NULL parameters disable their predicate; a NULL limit means ALL.
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE is_published = true
               AND ($1::BIGINT IS NULL OR category_id = $1)
               AND ($2::BIGINT IS NULL OR id <> $2)
               AND ($3 = false OR is_featured = true)
             {ORDER}
             LIMIT $4"
        );
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(filter.category_id)
            .bind(filter.exclude_id)
            .bind(filter.featured_only)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_author(
        &self,
        author_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<Article>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE author_id = $1 {ORDER} LIMIT $2");
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(author_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(&self, id: DbId, input: &UpdateArticle) -> Result<Option<Article>, DbError> {
        let query = format!(
            "UPDATE articles SET
                title = $2,
                subtitle = $3,
                body = $4,
                category_id = COALESCE($5, category_id),
                image_path = COALESCE($6, image_path),
                is_published = $7,
                is_featured = $8,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.body)
            .bind(input.category_id)
            .bind(&input.image_path)
            .bind(input.is_published)
            .bind(input.is_featured)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: DbId) -> Result<Option<i64>, DbError> {
        let views: Option<(i64,)> = sqlx::query_as(
            "UPDATE articles SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(views.map(|(count,)| count))
    }

    async fn author_stats(&self, author_id: DbId) -> Result<AuthorArticleStats, DbError> {
        Ok(sqlx::query_as::<_, AuthorArticleStats>(
            "SELECT COUNT(*) AS article_count,
                    COALESCE(SUM(view_count), 0)::BIGINT AS total_views
             FROM articles WHERE author_id = $1",
        )
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?)
    }
}
