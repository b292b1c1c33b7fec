//! Advertisement authoring routes. Every route requires a staff account.

use axum::routing::get;
use axum::Router;

use crate::handlers::advertisements;
use crate::state::AppState;

/// ```text
/// GET  /creer-publicite            -> create_form
/// POST /creer-publicite            -> create
/// GET  /liste-publicites           -> list_mine
/// GET  /modifier-publicite/{id}    -> edit_form
/// POST /modifier-publicite/{id}    -> edit
/// GET  /supprimer-publicite/{id}   -> delete_confirm
/// POST /supprimer-publicite/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/creer-publicite",
            get(advertisements::create_form).post(advertisements::create),
        )
        .route("/liste-publicites", get(advertisements::list_mine))
        .route(
            "/modifier-publicite/{id}",
            get(advertisements::edit_form).post(advertisements::edit),
        )
        .route(
            "/supprimer-publicite/{id}",
            get(advertisements::delete_confirm).post(advertisements::delete),
        )
}
