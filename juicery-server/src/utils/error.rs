//! Error handling
//!
//! Handlers return [`AppResult`]. Lower layers have their own error types that
//! convert into [`AppError`] with `?`:
//!
//! - [`RepoError`] from single-statement repository calls
//! - [`ServiceError`] from multi-statement workflow operations
//!
//! Infrastructure failures are logged here and surface to the client as a
//! generic `DatabaseError` without internal detail.

use axum::response::IntoResponse;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: database or infrastructure error (logged, mapped to `DatabaseError`)
/// - `App`: business-rule error passed through to the client unchanged
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Db(e) => write!(f, "database error: {e}"),
            ServiceError::App(e) => write!(f, "{e}"),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Database(msg) => ServiceError::Db(msg.into()),
            other => ServiceError::App(other.into()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::NotFound("Pallet 9 not found".into()).into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);

        let err: AppError = RepoError::Duplicate("qr_code".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_service_error_passes_business_errors_through() {
        let err: AppError = ServiceError::App(AppError::new(ErrorCode::OrderCratesIncomplete)).into();
        assert_eq!(err.code, ErrorCode::OrderCratesIncomplete);

        let err: AppError = ServiceError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
