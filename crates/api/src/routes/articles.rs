//! Article authoring routes. Every route requires a staff account.

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// ```text
/// GET  /creer-article             -> create_form
/// POST /creer-article             -> create
/// GET  /liste-articles            -> list_mine
/// GET  /modifier-article/{id}     -> edit_form
/// POST /modifier-article/{id}     -> edit
/// GET  /supprimer-article/{id}    -> delete_confirm
/// POST /supprimer-article/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/creer-article",
            get(articles::create_form).post(articles::create),
        )
        .route("/liste-articles", get(articles::list_mine))
        .route(
            "/modifier-article/{id}",
            get(articles::edit_form).post(articles::edit),
        )
        .route(
            "/supprimer-article/{id}",
            get(articles::delete_confirm).post(articles::delete),
        )
}
