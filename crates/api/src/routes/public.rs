//! Public reading routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// ```text
/// GET /                       -> home
/// GET /categorie/{key}        -> category_articles
/// GET /article/{id}           -> article_detail
/// GET /publicite/{id}/clic    -> ad_click
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(public::home))
        .route("/categorie/{key}", get(public::category_articles))
        .route("/article/{id}", get(public::article_detail))
        .route("/publicite/{id}/clic", get(public::ad_click))
}
