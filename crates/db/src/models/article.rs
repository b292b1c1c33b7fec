//! Article entity model and DTOs.

use nimba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `articles` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub image_path: Option<String>,
    pub author_id: DbId,
    pub category_id: DbId,
    pub published_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_published: bool,
    pub is_featured: bool,
    pub view_count: i64,
}

/// DTO for creating a new article.
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub image_path: Option<String>,
    pub author_id: DbId,
    pub category_id: DbId,
    pub is_published: bool,
    pub is_featured: bool,
}

/// DTO for editing an article.
///
/// Text fields and flags are replaced; `category_id` and `image_path` keep
/// their current value when `None`.
#[derive(Debug, Clone)]
pub struct UpdateArticle {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: String,
    pub category_id: Option<DbId>,
    pub image_path: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
}

/// Filter for public (published-only) article listings.
///
/// Results are always ordered newest publication first.
#[derive(Debug, Clone, Default)]
pub struct PublishedArticleFilter {
    pub category_id: Option<DbId>,
    pub exclude_id: Option<DbId>,
    pub featured_only: bool,
    pub limit: Option<i64>,
}

/// Per-author totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct AuthorArticleStats {
    pub article_count: i64,
    pub total_views: i64,
}
