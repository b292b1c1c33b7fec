//! Login, logout and the dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, dashboard};
use crate::state::AppState;

/// ```text
/// GET  /connexion  -> login_status
/// POST /connexion  -> login
/// POST /logout     -> logout (requires auth)
/// GET  /dashboard  -> dashboard (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connexion", get(auth::login_status).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
}
