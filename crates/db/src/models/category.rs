//! Category entity model and DTOs.

use nimba_core::category::{CategoryKey, CategorySeed};
use nimba_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub key: String,
    pub description: String,
    pub display_order: i32,
}

impl Category {
    /// Display name for the key, falling back to the raw key.
    pub fn label(&self) -> &str {
        match self.key.parse::<CategoryKey>() {
            Ok(key) => key.label(),
            Err(_) => &self.key,
        }
    }
}

/// Category as returned by the API, with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: DbId,
    pub key: String,
    pub label: String,
    pub description: String,
    pub display_order: i32,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            key: category.key.clone(),
            label: category.label().to_string(),
            description: category.description.clone(),
            display_order: category.display_order,
        }
    }
}

/// DTO for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub key: String,
    pub description: String,
    pub display_order: i32,
}

impl From<&CategorySeed> for CreateCategory {
    fn from(seed: &CategorySeed) -> Self {
        Self {
            key: seed.key.as_str().to_string(),
            description: seed.description.to_string(),
            display_order: seed.display_order,
        }
    }
}
