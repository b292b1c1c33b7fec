//! Advertisement placement and validity rules.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum number of sidebar advertisements shown on the home page.
pub const HOME_SIDEBAR_AD_LIMIT: i64 = 3;

/// Where on the page an advertisement is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdPosition {
    Header,
    Sidebar,
    Footer,
    /// Inside the article detail page.
    InArticle,
}

impl AdPosition {
    pub const ALL: [AdPosition; 4] = [
        AdPosition::Header,
        AdPosition::Sidebar,
        AdPosition::Footer,
        AdPosition::InArticle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdPosition::Header => "header",
            AdPosition::Sidebar => "sidebar",
            AdPosition::Footer => "footer",
            AdPosition::InArticle => "article",
        }
    }
}

impl fmt::Display for AdPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdPosition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdPosition::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown advertisement position '{s}'. Expected one of: header, sidebar, footer, article"
                ))
            })
    }
}

/// An advertisement may be shown at `now` when it is switched on and `now`
/// falls inside its inclusive `[starts_at, ends_at]` window.
pub fn is_valid_at(is_active: bool, starts_at: Timestamp, ends_at: Timestamp, now: Timestamp) -> bool {
    is_active && starts_at <= now && now <= ends_at
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn position_parses_known_values() {
        assert_eq!("header".parse::<AdPosition>().unwrap(), AdPosition::Header);
        assert_eq!("article".parse::<AdPosition>().unwrap(), AdPosition::InArticle);
        assert!("popup".parse::<AdPosition>().is_err());
    }

    #[test]
    fn validity_window_is_inclusive() {
        let now = Utc::now();
        assert!(is_valid_at(true, now, now, now));
        assert!(is_valid_at(true, now - Duration::days(1), now + Duration::days(1), now));
    }

    #[test]
    fn inactive_or_out_of_window_is_invalid() {
        let now = Utc::now();
        let start = now - Duration::hours(2);
        let end = now + Duration::hours(2);
        assert!(!is_valid_at(false, start, end, now));
        assert!(!is_valid_at(true, now + Duration::seconds(1), end, now));
        assert!(!is_valid_at(true, start, now - Duration::seconds(1), now));
    }
}
