//! Advertisement authoring: create, list, edit and delete the caller's ads.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nimba_core::advertisement::AdPosition;
use nimba_core::error::CoreError;
use nimba_core::forms::AdvertisementForm;
use nimba_core::types::DbId;
use nimba_db::models::advertisement::{Advertisement, CreateAdvertisement, UpdateAdvertisement};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdvertisementFormData {
    pub advertisement: Option<Advertisement>,
    pub positions: Vec<&'static str>,
}

fn positions() -> Vec<&'static str> {
    AdPosition::ALL.iter().map(|p| p.as_str()).collect()
}

/// Load an advertisement the user owns. Someone else's is reported as not
/// found.
async fn ensure_owned_ad(state: &AppState, id: DbId, author_id: DbId) -> AppResult<Advertisement> {
    state
        .repos
        .advertisements
        .find_owned(id, author_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Advertisement",
            id,
        }))
}

/// GET /creer-publicite
pub async fn create_form(
    RequireStaff(_user): RequireStaff,
) -> Json<DataResponse<AdvertisementFormData>> {
    Json(DataResponse::new(AdvertisementFormData {
        advertisement: None,
        positions: positions(),
    }))
}

/// POST /creer-publicite
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    AppJson(form): AppJson<AdvertisementForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Advertisement>>)> {
    let input = form.validate_new()?;
    let image_path = input
        .image_path
        .ok_or_else(|| CoreError::Validation("An image is required".into()))?;

    let ad = state
        .repos
        .advertisements
        .create(&CreateAdvertisement {
            title: input.title,
            description: input.description,
            image_path,
            link: input.link,
            position: input.position.as_str().to_string(),
            author_id: user.user_id,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
        })
        .await?;
    tracing::info!(user_id = user.user_id, ad_id = ad.id, position = %ad.position, "Advertisement created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(ad))))
}

/// GET /liste-publicites
pub async fn list_mine(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<Advertisement>>>> {
    let ads = state
        .repos
        .advertisements
        .list_by_author(user.user_id)
        .await?;
    Ok(Json(DataResponse::new(ads)))
}

/// GET /modifier-publicite/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdvertisementFormData>>> {
    let ad = ensure_owned_ad(&state, id, user.user_id).await?;
    Ok(Json(DataResponse::new(AdvertisementFormData {
        advertisement: Some(ad),
        positions: positions(),
    })))
}

/// POST /modifier-publicite/{id}
pub async fn edit(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
    AppJson(form): AppJson<AdvertisementForm>,
) -> AppResult<Json<DataResponse<Advertisement>>> {
    ensure_owned_ad(&state, id, user.user_id).await?;
    let input = form.validate_edit()?;

    let ad = state
        .repos
        .advertisements
        .update(
            id,
            &UpdateAdvertisement {
                title: input.title,
                description: input.description,
                image_path: input.image_path,
                link: input.link,
                position: input.position.as_str().to_string(),
                starts_at: input.starts_at,
                ends_at: input.ends_at,
                is_active: input.is_active,
            },
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Advertisement",
            id,
        }))?;
    tracing::info!(user_id = user.user_id, ad_id = id, "Advertisement updated");

    Ok(Json(DataResponse::new(ad)))
}

/// GET /supprimer-publicite/{id}
///
/// Confirmation view; changes nothing.
pub async fn delete_confirm(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Advertisement>>> {
    let ad = ensure_owned_ad(&state, id, user.user_id).await?;
    Ok(Json(DataResponse::new(ad)))
}

/// POST /supprimer-publicite/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_owned_ad(&state, id, user.user_id).await?;
    state.repos.advertisements.delete(id).await?;
    tracing::info!(user_id = user.user_id, ad_id = id, "Advertisement deleted");
    Ok(StatusCode::NO_CONTENT)
}
