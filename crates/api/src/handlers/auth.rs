//! Handlers for staff login and logout.

use std::sync::OnceLock;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{Duration, Utc};
use nimba_core::error::CoreError;
use nimba_core::types::DbId;
use nimba_db::models::session::CreateSession;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::{authenticate, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// The only message a failed login ever returns.
pub const INVALID_LOGIN: &str = "Invalid credentials or access not permitted";

/// Hash verified against when the username is unknown, so that a miss costs
/// the same argon2 work as a wrong password.
fn dummy_password_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| hash_password("nimba24-unknown-account").ok())
        .as_deref()
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /connexion`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`LoginResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginStatus {
    pub authenticated: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /connexion
///
/// Staff already holding a valid token go straight to the dashboard.
pub async fn login_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match authenticate(&headers, &state).await {
        Ok(user) if user.is_staff => Redirect::to("/dashboard").into_response(),
        _ => Json(DataResponse::new(LoginStatus {
            authenticated: false,
        }))
        .into_response(),
    }
}

/// POST /connexion
///
/// Only active staff accounts may log in. Every failure looks the same.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_LOGIN.into()));

    let Some(user) = state
        .repos
        .users
        .find_by_username(input.username.trim())
        .await?
    else {
        if let Some(hash) = dummy_password_hash() {
            let _ = verify_password(&input.password, hash);
        }
        return Err(invalid());
    };

    let password_valid = verify_password(&input.password, &user.password_hash).unwrap_or_else(|e| {
        tracing::warn!(user_id = user.id, error = %e, "Stored password hash is malformed");
        false
    });

    if !password_valid || !user.is_active || !user.is_staff {
        tracing::info!(user_id = user.id, "Login refused");
        return Err(invalid());
    }

    let jwt = &state.config.jwt;
    let session = state
        .repos
        .sessions
        .create(&CreateSession {
            user_id: user.id,
            expires_at: Utc::now() + Duration::minutes(jwt.access_token_expiry_mins),
        })
        .await?;

    let access_token = generate_access_token(user.id, session.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    state.repos.users.record_login(user.id).await?;
    tracing::info!(user_id = user.id, session_id = session.id, "Staff logged in");

    Ok(Json(DataResponse::new(LoginResponse {
        access_token,
        expires_in: jwt.expires_in_secs(),
        user: UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
        },
    })))
}

/// POST /logout
///
/// Revokes the caller's session and sends them home.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<Redirect> {
    state.repos.sessions.revoke(user.session_id).await?;
    tracing::info!(user_id = user.user_id, session_id = user.session_id, "Logged out");
    Ok(Redirect::to("/"))
}
