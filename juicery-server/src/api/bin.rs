//! Bin API: binned customers, restore and permanent purge

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::core::ServerState;
use crate::db::repository::customer;
use crate::utils::{ApiResponse, AppResult};
use crate::workflow;
use shared::models::Customer;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/bin", get(list))
        .route("/api/bin/{id}/restore", post(restore))
        .route("/api/bin/{id}", delete(purge))
}

/// GET /api/bin
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Customer>>> {
    let customers = customer::find_binned(&state.pool).await?;
    Ok(ApiResponse::success(customers))
}

/// POST /api/bin/{id}/restore
pub async fn restore(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<ApiResponse<()>> {
    workflow::bin::restore(&state.pool, &state.events, id).await?;
    Ok(ApiResponse::message("Customer restored"))
}

/// DELETE /api/bin/{id}
pub async fn purge(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<ApiResponse<()>> {
    workflow::bin::purge(&state.pool, &state.events, id).await?;
    Ok(ApiResponse::message("Customer permanently deleted"))
}
