//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::OrderNotFound
            | Self::CrateNotFound
            | Self::PalletNotFound
            | Self::ShelfNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::CustomerAlreadyDeleted
            | Self::CustomerNotInBin
            | Self::OrderInvalidTransition
            | Self::CrateOnOtherPallet
            | Self::PalletOnOtherShelf => StatusCode::CONFLICT,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::PrinterNotAvailable
            | Self::PrintFailed
            | Self::SmsFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, guard failures, capacity)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
