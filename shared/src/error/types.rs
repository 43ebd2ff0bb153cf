//! `AppError` and the `ApiResponse` envelope every endpoint answers with

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Structured detail map carried by errors (`field`, `order_id`, `qr`, ...)
pub type Details = HashMap<String, Value>;

/// Business or infrastructure failure as the client sees it
///
/// The [`ErrorCode`] decides the HTTP status; `message` is shown to staff at
/// the counter and `details` names the offending field, id or QR code.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Details>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail entry; later keys overwrite earlier ones
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Shorthands ====================

    /// Missing or blank input (`ValidationFailed`)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Body that could not be decoded at all (`InvalidRequest`)
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Numeric input above its allowed maximum
    pub fn out_of_range(field: &str, value: i64, max: i64) -> Self {
        Self::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not exceed {max}"),
        )
        .with_detail("field", field)
        .with_detail(field, value)
        .with_detail("max", max)
    }

    /// Generic lookup miss, e.g. `not_found("Pallet 4")`
    pub fn not_found(what: impl Into<String>) -> Self {
        let what = what.into();
        Self::with_message(ErrorCode::NotFound, format!("{what} not found")).with_detail("resource", what)
    }

    /// Unique constraint hit on insert
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Storage could not be opened or migrated
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn order_not_found(order_id: i64) -> Self {
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
            .with_detail("order_id", order_id)
    }

    pub fn customer_not_found(customer_id: i64) -> Self {
        Self::with_message(
            ErrorCode::CustomerNotFound,
            format!("Customer {customer_id} not found"),
        )
        .with_detail("customer_id", customer_id)
    }

    /// Status change rejected by the order state machine
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        let (from, to) = (from.into(), to.into());
        Self::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Cannot move order from {from} to {to}"),
        )
        .with_detail("from", from)
        .with_detail("to", to)
    }
}

/// Response envelope: `{code, message, data?, details?}`
///
/// `code` is [`ErrorCode::Success`] (0) on success; `message` is always set
/// so the scanner UI can show it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    /// Payload plus a message for the operator, e.g. "3 crate(s) mapped"
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Message-only success, used by the status transitions
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        err.clone().into()
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "Request failed with system error");
        }
        (status, axum::Json(ApiResponse::<()>::from(self))).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.map(ErrorCode::try_from) {
            None | Some(Ok(ErrorCode::Success)) => StatusCode::OK,
            Some(Ok(code)) => code.http_status(),
            Some(Err(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_code_message() {
        let err = AppError::new(ErrorCode::OrderCratesIncomplete);
        assert_eq!(err.code, ErrorCode::OrderCratesIncomplete);
        assert_eq!(err.message, "Crates incomplete");
        assert!(err.details.is_none());
        assert_eq!(err.to_string(), "Crates incomplete");
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "pallet_id")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "pallet_id");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_domain_shorthands() {
        let err = AppError::order_not_found(7);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order 7 not found");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);

        let err = AppError::invalid_transition("picked-up", "loading");
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.details.unwrap().get("from").unwrap(), "picked-up");

        let err = AppError::not_found("Pallet 4");
        assert_eq!(err.message, "Pallet 4 not found");

        let err = AppError::out_of_range("total_pouches", 9000, 4000);
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        let details = err.details.unwrap();
        assert_eq!(details.get("total_pouches").unwrap(), 9000);
        assert_eq!(details.get("max").unwrap(), 4000);
    }

    #[test]
    fn test_message_only_response() {
        let response = ApiResponse::message("Order moved to processing");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "Order moved to processing");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_error_response_carries_code_and_details() {
        let err = AppError::new(ErrorCode::PalletNotFound).with_detail("qr", "PALLET_x");
        let response = ApiResponse::<()>::error(&err);

        assert_eq!(response.code, Some(3101));
        assert_eq!(response.message, "Pallet QR not found");
        assert!(response.data.is_none());
        assert_eq!(response.details.unwrap().get("qr").unwrap(), "PALLET_x");
    }

    #[test]
    fn test_response_status_follows_code() {
        use axum::response::IntoResponse;

        let ok = ApiResponse::success(42).into_response();
        assert_eq!(ok.status(), StatusCode::OK);

        let conflict = ApiResponse::<()>::from(AppError::new(ErrorCode::CrateOnOtherPallet)).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }
}
