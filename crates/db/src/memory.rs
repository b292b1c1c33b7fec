//! In-memory implementation of every repository trait.
//!
//! Mirrors the PostgreSQL schema closely enough for tests of the layers
//! above: unique keys, foreign keys, cascades and default orderings.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
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
use crate::repositories::{
    AdvertisementRepo, ArticleRepo, CategoryRepo, Repositories, SessionRepo, SubscriptionRepo,
    UserRepo,
};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    categories: Vec<Category>,
    articles: Vec<Article>,
    advertisements: Vec<Advertisement>,
    subscriptions: Vec<NewsletterSubscription>,
    users: Vec<User>,
    sessions: Vec<Session>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared in-memory tables behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Repositories {
    /// Repositories backed by a fresh, empty [`MemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            categories: store.clone(),
            articles: store.clone(),
            advertisements: store.clone(),
            subscriptions: store.clone(),
            users: store.clone(),
            sessions: store,
            pool: None,
        }
    }
}

fn limited<T>(rows: impl Iterator<Item = T>, limit: Option<i64>) -> Vec<T> {
    match limit {
        Some(n) => rows.take(usize::try_from(n).unwrap_or(0)).collect(),
        None => rows.collect(),
    }
}

/// Newest publication first, ties by id descending.
fn sort_articles(rows: &mut [Article]) {
    rows.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
}

/// Newest creation first, ties by id descending.
fn sort_advertisements(rows: &mut [Advertisement]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        let mut rows = self.tables().categories.clone();
        rows.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(rows)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, DbError> {
        Ok(self.tables().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Category>, DbError> {
        Ok(self
            .tables()
            .categories
            .iter()
            .find(|c| c.key == key)
            .cloned())
    }

    async fn get_or_create(&self, input: &CreateCategory) -> Result<(Category, bool), DbError> {
        let mut tables = self.tables();
        if let Some(existing) = tables.categories.iter().find(|c| c.key == input.key) {
            return Ok((existing.clone(), false));
        }
        let category = Category {
            id: tables.next_id(),
            key: input.key.clone(),
            description: input.description.clone(),
            display_order: input.display_order,
        };
        tables.categories.push(category.clone());
        Ok((category, true))
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        let deleted = tables.categories.len() < before;
        if deleted {
            tables.articles.retain(|a| a.category_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl ArticleRepo for MemoryStore {
    async fn create(&self, input: &CreateArticle) -> Result<Article, DbError> {
        let mut tables = self.tables();
        if !tables.categories.iter().any(|c| c.id == input.category_id) {
            return Err(DbError::ForeignKeyViolation("articles_category_id_fkey"));
        }
        if !tables.users.iter().any(|u| u.id == input.author_id) {
            return Err(DbError::ForeignKeyViolation("articles_author_id_fkey"));
        }
        let now = Utc::now();
        let article = Article {
            id: tables.next_id(),
            title: input.title.clone(),
            subtitle: input.subtitle.clone(),
            body: input.body.clone(),
            image_path: input.image_path.clone(),
            author_id: input.author_id,
            category_id: input.category_id,
            published_at: now,
            updated_at: now,
            is_published: input.is_published,
            is_featured: input.is_featured,
            view_count: 0,
        };
        tables.articles.push(article.clone());
        Ok(article)
    }

    async fn find_published(&self, id: DbId) -> Result<Option<Article>, DbError> {
        Ok(self
            .tables()
            .articles
            .iter()
            .find(|a| a.id == id && a.is_published)
            .cloned())
    }

    async fn find_owned(&self, id: DbId, author_id: DbId) -> Result<Option<Article>, DbError> {
        Ok(self
            .tables()
            .articles
            .iter()
            .find(|a| a.id == id && a.author_id == author_id)
            .cloned())
    }

    async fn list_published(
        &self,
        filter: &PublishedArticleFilter,
    ) -> Result<Vec<Article>, DbError> {
        let mut rows: Vec<Article> = self
            .tables()
            .articles
            .iter()
            .filter(|a| a.is_published)
            .filter(|a| filter.category_id.map_or(true, |id| a.category_id == id))
            .filter(|a| filter.exclude_id != Some(a.id))
            .filter(|a| !filter.featured_only || a.is_featured)
            .cloned()
            .collect();
        sort_articles(&mut rows);
        Ok(limited(rows.into_iter(), filter.limit))
    }

    async fn list_by_author(
        &self,
        author_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<Article>, DbError> {
        let mut rows: Vec<Article> = self
            .tables()
            .articles
            .iter()
            .filter(|a| a.author_id == author_id)
            .cloned()
            .collect();
        sort_articles(&mut rows);
        Ok(limited(rows.into_iter(), limit))
    }

    async fn update(&self, id: DbId, input: &UpdateArticle) -> Result<Option<Article>, DbError> {
        let mut tables = self.tables();
        if let Some(category_id) = input.category_id {
            if !tables.categories.iter().any(|c| c.id == category_id) {
                return Err(DbError::ForeignKeyViolation("articles_category_id_fkey"));
            }
        }
        let Some(article) = tables.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        article.title = input.title.clone();
        article.subtitle = input.subtitle.clone();
        article.body = input.body.clone();
        if let Some(category_id) = input.category_id {
            article.category_id = category_id;
        }
        if let Some(image_path) = &input.image_path {
            article.image_path = Some(image_path.clone());
        }
        article.is_published = input.is_published;
        article.is_featured = input.is_featured;
        article.updated_at = Utc::now();
        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let before = tables.articles.len();
        tables.articles.retain(|a| a.id != id);
        Ok(tables.articles.len() < before)
    }

    async fn increment_views(&self, id: DbId) -> Result<Option<i64>, DbError> {
        let mut tables = self.tables();
        Ok(tables.articles.iter_mut().find(|a| a.id == id).map(|a| {
            a.view_count += 1;
            a.view_count
        }))
    }

    async fn author_stats(&self, author_id: DbId) -> Result<AuthorArticleStats, DbError> {
        let tables = self.tables();
        let owned = tables.articles.iter().filter(|a| a.author_id == author_id);
        let mut stats = AuthorArticleStats::default();
        for article in owned {
            stats.article_count += 1;
            stats.total_views += article.view_count;
        }
        Ok(stats)
    }
}

#[async_trait]
impl AdvertisementRepo for MemoryStore {
    async fn create(&self, input: &CreateAdvertisement) -> Result<Advertisement, DbError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.id == input.author_id) {
            return Err(DbError::ForeignKeyViolation("advertisements_author_id_fkey"));
        }
        let ad = Advertisement {
            id: tables.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            image_path: input.image_path.clone(),
            link: input.link.clone(),
            position: input.position.clone(),
            author_id: input.author_id,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            is_active: true,
            click_count: 0,
            created_at: Utc::now(),
        };
        tables.advertisements.push(ad.clone());
        Ok(ad)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Advertisement>, DbError> {
        Ok(self
            .tables()
            .advertisements
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_owned(
        &self,
        id: DbId,
        author_id: DbId,
    ) -> Result<Option<Advertisement>, DbError> {
        Ok(self
            .tables()
            .advertisements
            .iter()
            .find(|a| a.id == id && a.author_id == author_id)
            .cloned())
    }

    async fn list_valid(
        &self,
        position: &str,
        now: Timestamp,
        limit: Option<i64>,
    ) -> Result<Vec<Advertisement>, DbError> {
        let mut rows: Vec<Advertisement> = self
            .tables()
            .advertisements
            .iter()
            .filter(|a| a.position == position && a.is_valid_at(now))
            .cloned()
            .collect();
        sort_advertisements(&mut rows);
        Ok(limited(rows.into_iter(), limit))
    }

    async fn list_by_author(&self, author_id: DbId) -> Result<Vec<Advertisement>, DbError> {
        let mut rows: Vec<Advertisement> = self
            .tables()
            .advertisements
            .iter()
            .filter(|a| a.author_id == author_id)
            .cloned()
            .collect();
        sort_advertisements(&mut rows);
        Ok(rows)
    }

    async fn count_by_author(&self, author_id: DbId) -> Result<i64, DbError> {
        let count = self
            .tables()
            .advertisements
            .iter()
            .filter(|a| a.author_id == author_id)
            .count();
        Ok(count as i64)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateAdvertisement,
    ) -> Result<Option<Advertisement>, DbError> {
        let mut tables = self.tables();
        let Some(ad) = tables.advertisements.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        ad.title = input.title.clone();
        ad.description = input.description.clone();
        if let Some(image_path) = &input.image_path {
            ad.image_path = image_path.clone();
        }
        ad.link = input.link.clone();
        ad.position = input.position.clone();
        ad.starts_at = input.starts_at;
        ad.ends_at = input.ends_at;
        ad.is_active = input.is_active;
        Ok(Some(ad.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, DbError> {
        let mut tables = self.tables();
        let before = tables.advertisements.len();
        tables.advertisements.retain(|a| a.id != id);
        Ok(tables.advertisements.len() < before)
    }

    async fn increment_clicks(&self, id: DbId) -> Result<Option<Advertisement>, DbError> {
        let mut tables = self.tables();
        Ok(tables
            .advertisements
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| {
                a.click_count += 1;
                a.clone()
            }))
    }
}

#[async_trait]
impl SubscriptionRepo for MemoryStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>, DbError> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn create(&self, email: &str) -> Result<NewsletterSubscription, DbError> {
        let mut tables = self.tables();
        if tables.subscriptions.iter().any(|s| s.email == email) {
            return Err(DbError::UniqueViolation("uq_newsletter_subscriptions_email"));
        }
        let subscription = NewsletterSubscription {
            id: tables.next_id(),
            email: email.to_string(),
            subscribed_at: Utc::now(),
            is_active: true,
        };
        tables.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn set_active(
        &self,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscription>, DbError> {
        let mut tables = self.tables();
        Ok(tables
            .subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| {
                s.is_active = is_active;
                s.clone()
            }))
    }

    async fn list_active_emails(&self) -> Result<Vec<String>, DbError> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.email.clone())
            .collect())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, input: &CreateUser) -> Result<User, DbError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.username == input.username) {
            return Err(DbError::UniqueViolation("uq_users_username"));
        }
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            is_staff: input.is_staff,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, DbError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn record_login(&self, id: DbId) -> Result<(), DbError> {
        if let Some(user) = self.tables().users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepo for MemoryStore {
    async fn create(&self, input: &CreateSession) -> Result<Session, DbError> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.id == input.user_id) {
            return Err(DbError::ForeignKeyViolation("sessions_user_id_fkey"));
        }
        let session = Session {
            id: tables.next_id(),
            user_id: input.user_id,
            expires_at: input.expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_active(&self, id: DbId) -> Result<Option<Session>, DbError> {
        let now = Utc::now();
        Ok(self
            .tables()
            .sessions
            .iter()
            .find(|s| s.id == id && s.revoked_at.is_none() && s.expires_at > now)
            .cloned())
    }

    async fn revoke(&self, id: DbId) -> Result<bool, DbError> {
        let mut tables = self.tables();
        match tables
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.revoked_at.is_none())
        {
            Some(session) => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;

    async fn seed(repos: &Repositories) -> (User, Category) {
        let user = repos
            .users
            .create(&CreateUser {
                username: "editor".into(),
                email: "editor@nimba24.test".into(),
                password_hash: "x".into(),
                is_staff: true,
            })
            .await
            .unwrap();
        let (category, _) = repos
            .categories
            .get_or_create(&CreateCategory {
                key: "sport".into(),
                description: "Sport et jeunesse".into(),
                display_order: 7,
            })
            .await
            .unwrap();
        (user, category)
    }

    fn article(author_id: DbId, category_id: DbId, title: &str, published: bool) -> CreateArticle {
        CreateArticle {
            title: title.into(),
            subtitle: None,
            body: "...".into(),
            image_path: None,
            author_id,
            category_id,
            is_published: published,
            is_featured: false,
        }
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let repos = Repositories::in_memory();
        let input = CreateCategory {
            key: "sport".into(),
            description: "Sport & Jeunesse".into(),
            display_order: 7,
        };
        let (first, created) = repos.categories.get_or_create(&input).await.unwrap();
        assert!(created);
        let (second, created) = repos.categories.get_or_create(&input).await.unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(repos.categories.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn category_delete_cascades_to_articles() {
        let repos = Repositories::in_memory();
        let (user, category) = seed(&repos).await;
        let created = repos
            .articles
            .create(&article(user.id, category.id, "Finale", true))
            .await
            .unwrap();

        assert!(repos.categories.delete(category.id).await.unwrap());
        assert!(repos.articles.find_published(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn article_requires_existing_category() {
        let repos = Repositories::in_memory();
        let (user, _) = seed(&repos).await;
        let err = repos
            .articles
            .create(&article(user.id, 9_999, "Orphan", true))
            .await
            .unwrap_err();
        assert_matches!(err, DbError::ForeignKeyViolation(_));
    }

    #[tokio::test]
    async fn published_listing_filters_and_orders_newest_first() {
        let repos = Repositories::in_memory();
        let (user, category) = seed(&repos).await;
        let first = repos
            .articles
            .create(&article(user.id, category.id, "First", true))
            .await
            .unwrap();
        repos
            .articles
            .create(&article(user.id, category.id, "Draft", false))
            .await
            .unwrap();
        let third = repos
            .articles
            .create(&article(user.id, category.id, "Third", true))
            .await
            .unwrap();

        let rows = repos
            .articles
            .list_published(&PublishedArticleFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        let rows = repos
            .articles
            .list_published(&PublishedArticleFilter {
                exclude_id: Some(third.id),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first.id);
    }

    #[tokio::test]
    async fn views_accumulate_into_author_stats() {
        let repos = Repositories::in_memory();
        let (user, category) = seed(&repos).await;
        let created = repos
            .articles
            .create(&article(user.id, category.id, "Lu", true))
            .await
            .unwrap();
        for _ in 0..4 {
            repos.articles.increment_views(created.id).await.unwrap();
        }
        let stats = repos.articles.author_stats(user.id).await.unwrap();
        assert_eq!(stats.article_count, 1);
        assert_eq!(stats.total_views, 4);
    }

    #[tokio::test]
    async fn only_valid_ads_of_position_are_listed() {
        let repos = Repositories::in_memory();
        let (user, _) = seed(&repos).await;
        let now = Utc::now();
        let make = |position: &str, starts_at: Timestamp, ends_at: Timestamp| CreateAdvertisement {
            title: format!("{position} ad"),
            description: None,
            image_path: "publicites/a.png".into(),
            link: None,
            position: position.into(),
            author_id: user.id,
            starts_at,
            ends_at,
        };

        let live = repos
            .advertisements
            .create(&make("header", now - Duration::hours(1), now + Duration::hours(1)))
            .await
            .unwrap();
        repos
            .advertisements
            .create(&make("header", now + Duration::hours(1), now + Duration::hours(2)))
            .await
            .unwrap();
        repos
            .advertisements
            .create(&make("sidebar", now - Duration::hours(1), now + Duration::hours(1)))
            .await
            .unwrap();

        let rows = repos
            .advertisements
            .list_valid("header", now, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, live.id);
    }

    #[tokio::test]
    async fn duplicate_subscription_email_is_rejected() {
        let repos = Repositories::in_memory();
        repos.subscriptions.create("a@b.c").await.unwrap();
        let err = repos.subscriptions.create("a@b.c").await.unwrap_err();
        assert_matches!(err, DbError::UniqueViolation(_));
    }

    #[tokio::test]
    async fn revoked_session_is_not_active() {
        let repos = Repositories::in_memory();
        let (user, _) = seed(&repos).await;
        let session = repos
            .sessions
            .create(&CreateSession {
                user_id: user.id,
                expires_at: Utc::now() + Duration::hours(1),
            })
            .await
            .unwrap();
        assert!(repos.sessions.find_active(session.id).await.unwrap().is_some());
        assert!(repos.sessions.revoke(session.id).await.unwrap());
        assert!(repos.sessions.find_active(session.id).await.unwrap().is_none());
        assert!(!repos.sessions.revoke(session.id).await.unwrap());
    }
}
