pub mod advertisements;
pub mod articles;
pub mod auth;
pub mod health;
pub mod newsletter;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree. All routes live at the root.
///
/// ```text
/// /health                              health (public)
///
/// /                                    home (public)
/// /categorie/{key}                     category listing (public)
/// /article/{id}                        article detail, counts a view (public)
/// /publicite/{id}/clic                 ad click redirect (public)
/// /newsletter/subscribe                subscribe (POST, public)
///
/// /connexion                           login status (GET), login (POST)
/// /logout                              logout (POST, requires auth)
/// /dashboard                           staff dashboard
///
/// /creer-article                       form data (GET), create (POST)
/// /liste-articles                      own articles
/// /modifier-article/{id}               form data (GET), edit (POST)
/// /supprimer-article/{id}              confirm (GET), delete (POST)
///
/// /creer-publicite                     form data (GET), create (POST)
/// /liste-publicites                    own advertisements
/// /modifier-publicite/{id}             form data (GET), edit (POST)
/// /supprimer-publicite/{id}            confirm (GET), delete (POST)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(public::router())
        .merge(newsletter::router())
        .merge(auth::router())
        .merge(articles::router())
        .merge(advertisements::router())
}
