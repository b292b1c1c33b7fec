//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use nimba_core::error::CoreError;
use nimba_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization: Bearer` header.
///
/// The token must be valid, its session neither revoked nor expired, and the
/// account still active.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub session_id: DbId,
    pub username: String,
    pub is_staff: bool,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Resolve the caller from request headers.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> AppResult<AuthUser> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    let session = state
        .repos
        .sessions
        .find_active(claims.sid)
        .await?
        .filter(|s| s.user_id == claims.sub)
        .ok_or_else(|| unauthorized("Session expired or revoked"))?;

    let user = state
        .repos
        .users
        .find_by_id(claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| unauthorized("Account no longer active"))?;

    Ok(AuthUser {
        user_id: user.id,
        session_id: session.id,
        username: user.username,
        is_staff: user.is_staff,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).await
    }
}
