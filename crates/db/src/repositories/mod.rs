//! Repository layer.
//!
//! One trait per entity. The PostgreSQL implementations live in the
//! `*_repo` submodules; each holds a clone of the pool. [`Repositories`]
//! bundles one implementation of every trait for the application state.

use std::sync::Arc;

use async_trait::async_trait;
use nimba_core::types::{DbId, Timestamp};

use crate::error::DbError;
use crate::models::advertisement::{Advertisement, CreateAdvertisement, UpdateAdvertisement};
use crate::models::article::{
    Article, AuthorArticleStats, CreateArticle, PublishedArticleFilter, UpdateArticle,
};
use crate::models::category::{Category, CreateCategory};
use crate::models::newsletter::NewsletterSubscription;
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};
use crate::DbPool;

pub mod advertisement_repo;
pub mod article_repo;
pub mod category_repo;
pub mod session_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use advertisement_repo::PgAdvertisementRepo;
pub use article_repo::PgArticleRepo;
pub use category_repo::PgCategoryRepo;
pub use session_repo::PgSessionRepo;
pub use subscription_repo::PgSubscriptionRepo;
pub use user_repo::PgUserRepo;

/// Categories, ordered by display order then key.
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, DbError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, DbError>;

    async fn find_by_key(&self, key: &str) -> Result<Option<Category>, DbError>;

    /// Return the category with `input.key`, creating it if missing.
    /// The flag is `true` when a row was inserted.
    async fn get_or_create(&self, input: &CreateCategory) -> Result<(Category, bool), DbError>;

    /// Delete a category and, by cascade, its articles.
    async fn delete(&self, id: DbId) -> Result<bool, DbError>;
}

/// Articles. Every listing is ordered newest publication first.
#[async_trait]
pub trait ArticleRepo: Send + Sync {
    async fn create(&self, input: &CreateArticle) -> Result<Article, DbError>;

    /// Find an article only if it is published.
    async fn find_published(&self, id: DbId) -> Result<Option<Article>, DbError>;

    /// Find an article only if `author_id` wrote it.
    async fn find_owned(&self, id: DbId, author_id: DbId) -> Result<Option<Article>, DbError>;

    async fn list_published(
        &self,
        filter: &PublishedArticleFilter,
    ) -> Result<Vec<Article>, DbError>;

    async fn list_by_author(
        &self,
        author_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<Article>, DbError>;

    /// Apply an edit. Returns `None` if no row with `id` exists.
    async fn update(&self, id: DbId, input: &UpdateArticle) -> Result<Option<Article>, DbError>;

    async fn delete(&self, id: DbId) -> Result<bool, DbError>;

    /// Add one view and return the new count, `None` if the article is gone.
    async fn increment_views(&self, id: DbId) -> Result<Option<i64>, DbError>;

    async fn author_stats(&self, author_id: DbId) -> Result<AuthorArticleStats, DbError>;
}

/// Advertisements. Listings are ordered newest creation first.
#[async_trait]
pub trait AdvertisementRepo: Send + Sync {
    async fn create(&self, input: &CreateAdvertisement) -> Result<Advertisement, DbError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Advertisement>, DbError>;

    async fn find_owned(
        &self,
        id: DbId,
        author_id: DbId,
    ) -> Result<Option<Advertisement>, DbError>;

    /// Advertisements of `position` that are active and whose window contains `now`.
    async fn list_valid(
        &self,
        position: &str,
        now: Timestamp,
        limit: Option<i64>,
    ) -> Result<Vec<Advertisement>, DbError>;

    async fn list_by_author(&self, author_id: DbId) -> Result<Vec<Advertisement>, DbError>;

    async fn count_by_author(&self, author_id: DbId) -> Result<i64, DbError>;

    /// Apply an edit. Returns `None` if no row with `id` exists.
    async fn update(
        &self,
        id: DbId,
        input: &UpdateAdvertisement,
    ) -> Result<Option<Advertisement>, DbError>;

    async fn delete(&self, id: DbId) -> Result<bool, DbError>;

    /// Add one click and return the updated row, `None` if it does not exist.
    async fn increment_clicks(&self, id: DbId) -> Result<Option<Advertisement>, DbError>;
}

/// Newsletter subscriptions, keyed by email.
#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn find_by_email(&self, email: &str)
        -> Result<Option<NewsletterSubscription>, DbError>;

    /// Insert an active subscription.
    async fn create(&self, email: &str) -> Result<NewsletterSubscription, DbError>;

    async fn set_active(
        &self,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscription>, DbError>;

    async fn list_active_emails(&self) -> Result<Vec<String>, DbError>;
}

/// User accounts.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, input: &CreateUser) -> Result<User, DbError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, DbError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Set `last_login_at` to now.
    async fn record_login(&self, id: DbId) -> Result<(), DbError>;
}

/// Login sessions.
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn create(&self, input: &CreateSession) -> Result<Session, DbError>;

    /// Find a session that is neither revoked nor expired.
    async fn find_active(&self, id: DbId) -> Result<Option<Session>, DbError>;

    /// Revoke a session. Returns `true` if an active session was revoked.
    async fn revoke(&self, id: DbId) -> Result<bool, DbError>;
}

/// One implementation of every repository, shared by all handlers.
///
/// Cheaply cloneable: every member is behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepo>,
    pub articles: Arc<dyn ArticleRepo>,
    pub advertisements: Arc<dyn AdvertisementRepo>,
    pub subscriptions: Arc<dyn SubscriptionRepo>,
    pub users: Arc<dyn UserRepo>,
    pub sessions: Arc<dyn SessionRepo>,
    /// Set for PostgreSQL-backed repositories, used by the health check.
    pub pool: Option<DbPool>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing `pool`.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            categories: Arc::new(PgCategoryRepo::new(pool.clone())),
            articles: Arc::new(PgArticleRepo::new(pool.clone())),
            advertisements: Arc::new(PgAdvertisementRepo::new(pool.clone())),
            subscriptions: Arc::new(PgSubscriptionRepo::new(pool.clone())),
            users: Arc::new(PgUserRepo::new(pool.clone())),
            sessions: Arc::new(PgSessionRepo::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Whether the backing store answers. Always healthy without a pool.
    pub async fn health_check(&self) -> Result<(), DbError> {
        if let Some(pool) = &self.pool {
            crate::health_check(pool).await?;
        }
        Ok(())
    }
}
