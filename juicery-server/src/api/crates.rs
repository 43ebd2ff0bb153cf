//! Crate lookup by scanned QR

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};

use crate::core::ServerState;
use crate::db::repository::crates;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::CrateLookup;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/crates/{qr}", get(lookup))
}

/// GET /api/crates/{qr} - crate with its order, customer, pallet and shelf
pub async fn lookup(
    State(state): State<ServerState>,
    Path(qr): Path<String>,
) -> AppResult<ApiResponse<CrateLookup>> {
    let found = crates::lookup(&state.pool, qr.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CrateNotFound).with_detail("crate_id", qr.as_str()))?;
    Ok(ApiResponse::success(found))
}
