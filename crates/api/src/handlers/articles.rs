//! Article authoring: create, list, edit and delete the caller's articles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nimba_core::article::is_publish_transition;
use nimba_core::error::CoreError;
use nimba_core::forms::ArticleForm;
use nimba_core::types::DbId;
use nimba_db::models::article::{Article, CreateArticle, UpdateArticle};
use nimba_db::models::category::{Category, CategoryResponse};
use nimba_mail::ArticleDigest;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ArticleFormData {
    pub article: Option<Article>,
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize)]
pub struct ArticleWritten {
    pub article: Article,
    /// Subscribers addressed by the newsletter this write triggered.
    pub notified_subscribers: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an article the user owns. Someone else's article is reported as
/// not found.
async fn ensure_owned_article(state: &AppState, id: DbId, author_id: DbId) -> AppResult<Article> {
    state
        .repos
        .articles
        .find_owned(id, author_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

async fn ensure_category_exists(state: &AppState, id: DbId) -> AppResult<Category> {
    state
        .repos
        .categories
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

async fn category_choices(state: &AppState) -> AppResult<Vec<CategoryResponse>> {
    let categories = state.repos.categories.list().await?;
    Ok(categories.iter().map(CategoryResponse::from).collect())
}

/// Send the newsletter for a freshly published article.
///
/// `category` is the one loaded before the write; nothing here can fail the
/// request once the article is stored.
async fn notify_subscribers(state: &AppState, article: &Article, category: &Category) -> usize {
    let digest = ArticleDigest::new(
        article.id,
        &article.title,
        article.subtitle.as_deref(),
        category.label(),
        &article.body,
    );
    state.newsletter.notify_new_article(&digest).await
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /creer-article
pub async fn create_form(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> AppResult<Json<DataResponse<ArticleFormData>>> {
    Ok(Json(DataResponse::new(ArticleFormData {
        article: None,
        categories: category_choices(&state).await?,
    })))
}

/// POST /creer-article
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    AppJson(form): AppJson<ArticleForm>,
) -> AppResult<(StatusCode, Json<DataResponse<ArticleWritten>>)> {
    let input = form.validate_new()?;
    let category_id = input
        .category_id
        .ok_or_else(|| CoreError::Validation("Please select a category".into()))?;
    let category = ensure_category_exists(&state, category_id).await?;

    let article = state
        .repos
        .articles
        .create(&CreateArticle {
            title: input.title,
            subtitle: input.subtitle,
            body: input.body,
            image_path: input.image_path,
            author_id: user.user_id,
            category_id,
            is_published: input.is_published,
            is_featured: input.is_featured,
        })
        .await?;
    tracing::info!(user_id = user.user_id, article_id = article.id, "Article created");

    let notified_subscribers = if is_publish_transition(false, article.is_published) {
        notify_subscribers(&state, &article, &category).await
    } else {
        0
    };

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(ArticleWritten {
            article,
            notified_subscribers,
        })),
    ))
}

/// GET /liste-articles
pub async fn list_mine(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
) -> AppResult<Json<DataResponse<Vec<Article>>>> {
    let articles = state
        .repos
        .articles
        .list_by_author(user.user_id, None)
        .await?;
    Ok(Json(DataResponse::new(articles)))
}

/// GET /modifier-article/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArticleFormData>>> {
    let article = ensure_owned_article(&state, id, user.user_id).await?;
    Ok(Json(DataResponse::new(ArticleFormData {
        article: Some(article),
        categories: category_choices(&state).await?,
    })))
}

/// POST /modifier-article/{id}
///
/// The newsletter goes out only when this edit publishes the article.
pub async fn edit(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
    AppJson(form): AppJson<ArticleForm>,
) -> AppResult<Json<DataResponse<ArticleWritten>>> {
    let previous = ensure_owned_article(&state, id, user.user_id).await?;
    let input = form.validate_edit()?;
    let category =
        ensure_category_exists(&state, input.category_id.unwrap_or(previous.category_id)).await?;

    let article = state
        .repos
        .articles
        .update(
            id,
            &UpdateArticle {
                title: input.title,
                subtitle: input.subtitle,
                body: input.body,
                category_id: input.category_id,
                image_path: input.image_path,
                is_published: input.is_published,
                is_featured: input.is_featured,
            },
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;
    tracing::info!(user_id = user.user_id, article_id = id, "Article updated");

    let notified_subscribers = if is_publish_transition(previous.is_published, article.is_published)
    {
        notify_subscribers(&state, &article, &category).await
    } else {
        0
    };

    Ok(Json(DataResponse::new(ArticleWritten {
        article,
        notified_subscribers,
    })))
}

/// GET /supprimer-article/{id}
///
/// Confirmation view; changes nothing.
pub async fn delete_confirm(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Article>>> {
    let article = ensure_owned_article(&state, id, user.user_id).await?;
    Ok(Json(DataResponse::new(article)))
}

/// POST /supprimer-article/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_owned_article(&state, id, user.user_id).await?;
    state.repos.articles.delete(id).await?;
    tracing::info!(user_id = user.user_id, article_id = id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}
