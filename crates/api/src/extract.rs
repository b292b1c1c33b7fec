//! Request extractors shared by the handlers.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body whose rejections (bad syntax, wrong field types, missing
/// content type) use the API's `{error, code}` shape with `BAD_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
