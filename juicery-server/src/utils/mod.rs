//! Utilities: error types, request extractors and logging

pub mod error;
pub mod json;
pub mod logger;

pub use error::{
    ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, ServiceError, ServiceResult,
};
pub use json::AppJson;
