//! Advertisement entity model and DTOs.

use nimba_core::advertisement::is_valid_at;
use nimba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `advertisements` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Advertisement {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_path: String,
    pub link: Option<String>,
    pub position: String,
    pub author_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_active: bool,
    pub click_count: i64,
    pub created_at: Timestamp,
}

impl Advertisement {
    /// Whether the advertisement may be displayed at `now`.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        is_valid_at(self.is_active, self.starts_at, self.ends_at, now)
    }
}

/// DTO for creating a new advertisement. New advertisements are active.
#[derive(Debug, Clone)]
pub struct CreateAdvertisement {
    pub title: String,
    pub description: Option<String>,
    pub image_path: String,
    pub link: Option<String>,
    pub position: String,
    pub author_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// DTO for editing an advertisement. `image_path` keeps the current image
/// when `None`.
#[derive(Debug, Clone)]
pub struct UpdateAdvertisement {
    pub title: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub link: Option<String>,
    pub position: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_active: bool,
}
