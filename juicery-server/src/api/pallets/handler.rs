//! Pallet API Handlers

use axum::extract::{Path, State};

use crate::core::ServerState;
use crate::db::repository::{crates as crate_repo, pallet};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult};
use crate::workflow;
use shared::models::{AssignPalletRequest, AssignPalletResult, Crate, Pallet, PalletCreate};
use shared::qr::QrKind;

/// GET /api/pallets - pallets with holding counts
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Pallet>>> {
    let pallets = pallet::find_all(&state.pool).await?;
    Ok(ApiResponse::success(pallets))
}

/// POST /api/pallets - register a new pallet and issue its QR
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<PalletCreate>,
) -> AppResult<ApiResponse<Pallet>> {
    let capacity = payload.capacity.unwrap_or(state.config.pallet_capacity);
    let qr = QrKind::Pallet.generate();
    let created = pallet::create(&state.pool, &qr, capacity, shared::util::now_millis()).await?;
    tracing::info!(pallet = %created.qr_code, capacity, "Pallet created");
    Ok(ApiResponse::success(created))
}

/// GET /api/pallets/{id}/crates
pub async fn crates(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Crate>>> {
    pallet::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Pallet {id}")))?;
    let crates = crate_repo::find_by_pallet(&state.pool, id).await?;
    Ok(ApiResponse::success(crates))
}

/// POST /api/assign-pallet - map scanned crates onto a pallet
pub async fn assign(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<AssignPalletRequest>,
) -> AppResult<ApiResponse<AssignPalletResult>> {
    let result = workflow::assign_crates_to_pallet(&state.pool, &state.events, &payload).await?;
    let message = format!(
        "{} crate(s) mapped to pallet {}",
        result.mapped.len(),
        result.pallet_id
    );
    Ok(ApiResponse::success_with_message(message, result))
}
