//! PostgreSQL repository for the `newsletter_subscriptions` table.

use async_trait::async_trait;
use nimba_core::types::DbId;
use sqlx::PgPool;

use super::SubscriptionRepo;
use crate::error::DbError;
use crate::models::newsletter::NewsletterSubscription;

const COLUMNS: &str = "id, email, subscribed_at, is_active";

pub struct PgSubscriptionRepo {
    pool: PgPool,
}

impl PgSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepo for PgSubscriptionRepo {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM newsletter_subscriptions WHERE email = $1");
        Ok(sqlx::query_as::<_, NewsletterSubscription>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, email: &str) -> Result<NewsletterSubscription, DbError> {
        let query = format!(
            "INSERT INTO newsletter_subscriptions (email) VALUES ($1) RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, NewsletterSubscription>(&query)
            .bind(email)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn set_active(
        &self,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscription>, DbError> {
        let query = format!(
            "UPDATE newsletter_subscriptions SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, NewsletterSubscription>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_active_emails(&self) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT email FROM newsletter_subscriptions WHERE is_active = true ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(email,)| email).collect())
    }
}
