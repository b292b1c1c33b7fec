//! Public pages: home, category listing, article detail and ad clicks.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::HeaderValue;
use axum::response::Redirect;
use axum::Json;
use chrono::Utc;
use nimba_core::advertisement::{AdPosition, HOME_SIDEBAR_AD_LIMIT};
use nimba_core::article::{CATEGORY_PREVIEW_LIMIT, HOME_RECENT_LIMIT, SIMILAR_ARTICLES_LIMIT};
use nimba_core::category::CategoryKey;
use nimba_core::error::CoreError;
use nimba_core::types::DbId;
use nimba_db::models::advertisement::Advertisement;
use nimba_db::models::article::{Article, PublishedArticleFilter};
use nimba_db::models::category::{Category, CategoryResponse};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An article with its category resolved.
#[derive(Debug, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    pub category: Option<CategoryResponse>,
}

#[derive(Debug, Serialize)]
pub struct CategorySection {
    pub category: CategoryResponse,
    pub articles: Vec<ArticleView>,
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured: Option<ArticleView>,
    pub recent: Vec<ArticleView>,
    /// Only categories that have at least one published article.
    pub sections: Vec<CategorySection>,
    pub categories: Vec<CategoryResponse>,
    pub header_ad: Option<Advertisement>,
    pub sidebar_ads: Vec<Advertisement>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: CategoryResponse,
    pub articles: Vec<ArticleView>,
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub article: ArticleView,
    pub similar: Vec<ArticleView>,
    pub ad: Option<Advertisement>,
    pub categories: Vec<CategoryResponse>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Attaches categories to articles from one preloaded category list.
struct CategoryIndex {
    by_id: HashMap<DbId, CategoryResponse>,
    ordered: Vec<Category>,
}

impl CategoryIndex {
    async fn load(state: &AppState) -> AppResult<Self> {
        let ordered = state.repos.categories.list().await?;
        let by_id = ordered
            .iter()
            .map(|c| (c.id, CategoryResponse::from(c)))
            .collect();
        Ok(Self { by_id, ordered })
    }

    fn view(&self, article: Article) -> ArticleView {
        ArticleView {
            category: self.by_id.get(&article.category_id).cloned(),
            article,
        }
    }

    fn views(&self, articles: Vec<Article>) -> Vec<ArticleView> {
        articles.into_iter().map(|a| self.view(a)).collect()
    }

    fn responses(&self) -> Vec<CategoryResponse> {
        self.ordered.iter().map(CategoryResponse::from).collect()
    }
}

async fn published(state: &AppState, filter: PublishedArticleFilter) -> AppResult<Vec<Article>> {
    Ok(state.repos.articles.list_published(&filter).await?)
}

/// The featured article, falling back to the most recent published one.
async fn pick_featured(state: &AppState) -> AppResult<Option<Article>> {
    let featured = published(
        state,
        PublishedArticleFilter {
            featured_only: true,
            limit: Some(1),
            ..Default::default()
        },
    )
    .await?;
    if let Some(article) = featured.into_iter().next() {
        return Ok(Some(article));
    }

    let latest = published(
        state,
        PublishedArticleFilter {
            limit: Some(1),
            ..Default::default()
        },
    )
    .await?;
    Ok(latest.into_iter().next())
}

async fn valid_ads(
    state: &AppState,
    position: AdPosition,
    limit: i64,
) -> AppResult<Vec<Advertisement>> {
    Ok(state
        .repos
        .advertisements
        .list_valid(position.as_str(), Utc::now(), Some(limit))
        .await?)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn home(State(state): State<AppState>) -> AppResult<Json<DataResponse<HomePage>>> {
    let index = CategoryIndex::load(&state).await?;

    let featured = pick_featured(&state).await?;
    let recent = published(
        &state,
        PublishedArticleFilter {
            exclude_id: featured.as_ref().map(|a| a.id),
            limit: Some(HOME_RECENT_LIMIT),
            ..Default::default()
        },
    )
    .await?;

    let mut sections = Vec::new();
    for category in &index.ordered {
        let articles = published(
            &state,
            PublishedArticleFilter {
                category_id: Some(category.id),
                limit: Some(CATEGORY_PREVIEW_LIMIT),
                ..Default::default()
            },
        )
        .await?;
        if !articles.is_empty() {
            sections.push(CategorySection {
                category: CategoryResponse::from(category),
                articles: index.views(articles),
            });
        }
    }

    let header_ad = valid_ads(&state, AdPosition::Header, 1)
        .await?
        .into_iter()
        .next();
    let sidebar_ads = valid_ads(&state, AdPosition::Sidebar, HOME_SIDEBAR_AD_LIMIT).await?;

    Ok(Json(DataResponse::new(HomePage {
        featured: featured.map(|a| index.view(a)),
        recent: index.views(recent),
        sections,
        categories: index.responses(),
        header_ad,
        sidebar_ads,
    })))
}

/// GET /categorie/{key}
pub async fn category_articles(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<CategoryPage>>> {
    let key: CategoryKey = key.parse()?;
    let category = state
        .repos
        .categories
        .find_by_key(key.as_str())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundKey {
                entity: "Category",
                key: key.to_string(),
            })
        })?;

    let index = CategoryIndex::load(&state).await?;
    let articles = published(
        &state,
        PublishedArticleFilter {
            category_id: Some(category.id),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(DataResponse::new(CategoryPage {
        category: CategoryResponse::from(&category),
        articles: index.views(articles),
        categories: index.responses(),
    })))
}

/// GET /article/{id}
///
/// Every visit counts as a view.
pub async fn article_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArticlePage>>> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: "Article", id });

    let mut article = state
        .repos
        .articles
        .find_published(id)
        .await?
        .ok_or_else(not_found)?;
    article.view_count = state
        .repos
        .articles
        .increment_views(id)
        .await?
        .ok_or_else(not_found)?;

    let similar = published(
        &state,
        PublishedArticleFilter {
            category_id: Some(article.category_id),
            exclude_id: Some(article.id),
            limit: Some(SIMILAR_ARTICLES_LIMIT),
            ..Default::default()
        },
    )
    .await?;
    let ad = valid_ads(&state, AdPosition::InArticle, 1)
        .await?
        .into_iter()
        .next();

    let index = CategoryIndex::load(&state).await?;
    Ok(Json(DataResponse::new(ArticlePage {
        article: index.view(article),
        similar: index.views(similar),
        ad,
        categories: index.responses(),
    })))
}

/// GET /publicite/{id}/clic
///
/// Counts the click and redirects to the ad's link, or home without one.
pub async fn ad_click(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Redirect> {
    let ad = state
        .repos
        .advertisements
        .increment_clicks(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Advertisement",
            id,
        }))?;

    tracing::debug!(ad_id = ad.id, clicks = ad.click_count, "Advertisement clicked");

    // Links are validated on write; a row that still cannot be a header goes home.
    let target = match ad.link.as_deref() {
        Some(link) if HeaderValue::from_str(link).is_ok() => link,
        Some(_) => {
            tracing::warn!(ad_id = ad.id, "Advertisement link is not a valid redirect target");
            "/"
        }
        None => "/",
    };
    Ok(Redirect::to(target))
}
