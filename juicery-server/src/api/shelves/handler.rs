//! Shelf API Handlers

use axum::extract::{Path, State};

use crate::core::ServerState;
use crate::db::repository::{pallet, shelf};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult};
use crate::workflow;
use shared::models::{AssignShelfRequest, AssignShelfResult, Pallet, Shelf, ShelfCreate};
use shared::qr::QrKind;

/// GET /api/shelves
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Shelf>>> {
    let shelves = shelf::find_all(&state.pool).await?;
    Ok(ApiResponse::success(shelves))
}

/// POST /api/shelves
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ShelfCreate>,
) -> AppResult<ApiResponse<Shelf>> {
    let capacity = payload.capacity.unwrap_or(state.config.shelf_capacity);
    let qr = QrKind::Shelf.generate();
    let created = shelf::create(&state.pool, &qr, capacity, shared::util::now_millis()).await?;
    tracing::info!(shelf = %created.qr_code, capacity, "Shelf created");
    Ok(ApiResponse::success(created))
}

/// GET /api/shelves/{id}/pallets
pub async fn pallets(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Pallet>>> {
    shelf::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shelf {id}")))?;
    let pallets = pallet::find_by_shelf(&state.pool, id).await?;
    Ok(ApiResponse::success(pallets))
}

/// POST /api/assign-shelf
pub async fn assign(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<AssignShelfRequest>,
) -> AppResult<ApiResponse<AssignShelfResult>> {
    let result = workflow::assign_pallets_to_shelf(&state.pool, &state.events, &payload).await?;
    let message = format!(
        "{} pallet(s) placed on shelf {}",
        result.mapped.len(),
        result.shelf_id
    );
    Ok(ApiResponse::success_with_message(message, result))
}
