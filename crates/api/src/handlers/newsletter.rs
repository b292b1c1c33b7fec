//! Public newsletter subscription.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use nimba_core::newsletter::SubscribeOutcome;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub status: SubscribeOutcome,
    pub message: &'static str,
}

/// POST /newsletter/subscribe
///
/// 201 for a new subscriber, 200 when already subscribed or reactivated.
pub async fn subscribe(
    State(state): State<AppState>,
    AppJson(input): AppJson<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubscribeResponse>>)> {
    let outcome = state.newsletter.subscribe(&input.email).await?;

    let status = match outcome {
        SubscribeOutcome::Subscribed => StatusCode::CREATED,
        SubscribeOutcome::AlreadySubscribed | SubscribeOutcome::Reactivated => StatusCode::OK,
    };

    Ok((
        status,
        Json(DataResponse::new(SubscribeResponse {
            status: outcome,
            message: outcome.message(),
        })),
    ))
}
