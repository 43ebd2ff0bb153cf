//! JSON body extractor answering malformed bodies with an [`ApiResponse`]
//!
//! [`ApiResponse`]: super::ApiResponse

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use super::AppError;

/// `Json<T>` whose rejection is an `InvalidRequest` (400) [`AppError`]
///
/// Covers syntax errors, wrong or `null` field types and a missing
/// `content-type: application/json` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_error(rejection)),
        }
    }
}

fn body_error(rejection: JsonRejection) -> AppError {
    tracing::debug!(status = %rejection.status(), reason = %rejection.body_text(), "Request body rejected");
    AppError::invalid_request("Invalid request body").with_detail("reason", rejection.body_text())
}
