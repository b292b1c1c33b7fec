//! Startup data seeding.

use nimba_core::category::DEFAULT_CATEGORIES;
use nimba_db::models::category::CreateCategory;
use nimba_db::{DbError, Repositories};

/// Create every default category that does not exist yet.
///
/// Idempotent; returns how many categories were created.
pub async fn ensure_default_categories(repos: &Repositories) -> Result<usize, DbError> {
    let mut created = 0;
    for seed in &DEFAULT_CATEGORIES {
        let (category, inserted) = repos
            .categories
            .get_or_create(&CreateCategory::from(seed))
            .await?;
        if inserted {
            tracing::info!(key = %category.key, "Category created");
            created += 1;
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_twice_creates_nothing_new() {
        let repos = Repositories::in_memory();
        assert_eq!(ensure_default_categories(&repos).await.unwrap(), 7);
        assert_eq!(ensure_default_categories(&repos).await.unwrap(), 0);

        let keys: Vec<_> = repos
            .categories
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(
            keys,
            ["politique", "societe", "enquete", "culture", "diaspora", "economie", "sport"]
        );
    }
}
