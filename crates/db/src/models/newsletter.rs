//! Newsletter subscription model.

use nimba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `newsletter_subscriptions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct NewsletterSubscription {
    pub id: DbId,
    pub email: String,
    pub subscribed_at: Timestamp,
    pub is_active: bool,
}
