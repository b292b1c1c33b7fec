//! Staff dashboard.

use axum::extract::State;
use axum::Json;
use nimba_core::article::DASHBOARD_RECENT_LIMIT;
use nimba_db::models::article::Article;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub username: String,
    pub article_count: i64,
    pub ad_count: i64,
    /// Views summed over all of the user's articles.
    pub total_views: i64,
    pub recent_articles: Vec<Article>,
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let stats = state.repos.articles.author_stats(user.user_id).await?;
    let ad_count = state.repos.advertisements.count_by_author(user.user_id).await?;
    let recent_articles = state
        .repos
        .articles
        .list_by_author(user.user_id, Some(DASHBOARD_RECENT_LIMIT))
        .await?;

    Ok(Json(DataResponse::new(Dashboard {
        username: user.username,
        article_count: stats.article_count,
        ad_count,
        total_views: stats.total_views,
        recent_articles,
    })))
}
