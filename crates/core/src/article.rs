//! Article listing limits and the publish-transition rule.

/// Number of recent articles listed on the home page besides the featured one.
pub const HOME_RECENT_LIMIT: i64 = 10;

/// Number of articles previewed per category on the home page.
pub const CATEGORY_PREVIEW_LIMIT: i64 = 3;

/// Number of same-category suggestions on an article page.
pub const SIMILAR_ARTICLES_LIMIT: i64 = 3;

/// Number of recent articles on the staff dashboard.
pub const DASHBOARD_RECENT_LIMIT: i64 = 5;

/// Whether a write moves an article from unpublished to published.
///
/// A newly created article counts as previously unpublished. Subscribers are
/// notified only on this transition, so saving an already published article
/// again never re-sends the newsletter.
pub fn is_publish_transition(previously_published: bool, now_published: bool) -> bool {
    !previously_published && now_published
}
