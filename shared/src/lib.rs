//! Shared types for the juicery backend
//!
//! Domain models, server events, QR payloads and the unified error system,
//! used by the server.

pub mod error;
pub mod message;
pub mod models;
pub mod qr;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::ServerEvent;
