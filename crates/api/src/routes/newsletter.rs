use axum::routing::post;
use axum::Router;

use crate::handlers::newsletter;
use crate::state::AppState;

/// ```text
/// POST /newsletter/subscribe  -> subscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/newsletter/subscribe", post(newsletter::subscribe))
}
