//! Label printer status

use axum::{Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::printing::PrinterStatus;
use crate::utils::{ApiResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/printer/status", get(status))
}

/// GET /api/printer/status - probe reachability
pub async fn status(State(state): State<ServerState>) -> AppResult<ApiResponse<PrinterStatus>> {
    Ok(ApiResponse::success(state.printer.status().await))
}
