//! The fixed category catalogue.
//!
//! Categories are seeded at startup from [`DEFAULT_CATEGORIES`]; the set of
//! keys is closed, so anything outside [`CategoryKey`] is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// One of the seven editorial sections of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Politique,
    Societe,
    Enquete,
    Culture,
    Diaspora,
    Economie,
    Sport,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 7] = [
        CategoryKey::Politique,
        CategoryKey::Societe,
        CategoryKey::Enquete,
        CategoryKey::Culture,
        CategoryKey::Diaspora,
        CategoryKey::Economie,
        CategoryKey::Sport,
    ];

    /// The stored key, also used in `/categorie/{key}` URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Politique => "politique",
            CategoryKey::Societe => "societe",
            CategoryKey::Enquete => "enquete",
            CategoryKey::Culture => "culture",
            CategoryKey::Diaspora => "diaspora",
            CategoryKey::Economie => "economie",
            CategoryKey::Sport => "sport",
        }
    }

    /// Human-readable section name.
    pub fn label(self) -> &'static str {
        match self {
            CategoryKey::Politique => "Politique",
            CategoryKey::Societe => "Société",
            CategoryKey::Enquete => "Enquête & Reportage",
            CategoryKey::Culture => "Culture & Tradition du Nimba",
            CategoryKey::Diaspora => "Diaspora du Nimba",
            CategoryKey::Economie => "Économie Locale",
            CategoryKey::Sport => "Sport & Jeunesse",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::NotFoundKey {
                entity: "Category",
                key: s.to_string(),
            })
    }
}

/// A seed row for the category bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct CategorySeed {
    pub key: CategoryKey,
    pub description: &'static str,
    pub display_order: i32,
}

/// Categories created (if missing) on every startup.
pub const DEFAULT_CATEGORIES: [CategorySeed; 7] = [
    CategorySeed {
        key: CategoryKey::Politique,
        description: "Actualités politiques du Nimba",
        display_order: 1,
    },
    CategorySeed {
        key: CategoryKey::Societe,
        description: "Vie sociale et communautaire",
        display_order: 2,
    },
    CategorySeed {
        key: CategoryKey::Enquete,
        description: "Enquêtes et reportages approfondis",
        display_order: 3,
    },
    CategorySeed {
        key: CategoryKey::Culture,
        description: "Culture et traditions du Nimba",
        display_order: 4,
    },
    CategorySeed {
        key: CategoryKey::Diaspora,
        description: "Nouvelles de la diaspora",
        display_order: 5,
    },
    CategorySeed {
        key: CategoryKey::Economie,
        description: "Développement économique local",
        display_order: 6,
    },
    CategorySeed {
        key: CategoryKey::Sport,
        description: "Sport et jeunesse",
        display_order: 7,
    },
];

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for key in CategoryKey::ALL {
            assert_eq!(key.as_str().parse::<CategoryKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_key_is_not_found() {
        let err = "weather".parse::<CategoryKey>().unwrap_err();
        assert_matches!(err, CoreError::NotFoundKey { entity: "Category", ref key } if key == "weather");
    }

    #[test]
    fn sport_label_and_seed() {
        assert_eq!(CategoryKey::Sport.label(), "Sport & Jeunesse");
        let seed = DEFAULT_CATEGORIES
            .iter()
            .find(|s| s.key == CategoryKey::Sport)
            .unwrap();
        assert_eq!(seed.display_order, 7);
    }

    #[test]
    fn seeds_cover_every_key_in_order() {
        let keys: Vec<_> = DEFAULT_CATEGORIES.iter().map(|s| s.key).collect();
        assert_eq!(keys, CategoryKey::ALL.to_vec());
        let orders: Vec<_> = DEFAULT_CATEGORIES.iter().map(|s| s.display_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
