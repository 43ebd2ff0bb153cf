//! Customer API Handlers

use axum::extract::{Path, State};

use crate::core::ServerState;
use crate::db::repository::{customer, order};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult};
use crate::workflow::{self, IntakeRules};
use shared::models::{Customer, CustomerDetail, IntakeRequest, IntakeResult};

/// GET /api/customers - active customers
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Customer>>> {
    let customers = customer::find_active(&state.pool).await?;
    Ok(ApiResponse::success(customers))
}

/// POST /api/customers - intake: customer, pending order and crates
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<IntakeRequest>,
) -> AppResult<ApiResponse<IntakeResult>> {
    let result =
        workflow::register_order(&state.pool, &state.events, IntakeRules::from(&*state.config), payload).await?;
    Ok(ApiResponse::success_with_message("Order registered", result))
}

/// GET /api/customers/{id} - customer with all orders
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<CustomerDetail>> {
    let customer = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::customer_not_found(id))?;
    let orders = order::find_by_customer(&state.pool, id).await?;
    Ok(ApiResponse::success(CustomerDetail { customer, orders }))
}

/// DELETE /api/customers/{id} - move to bin
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<ApiResponse<()>> {
    workflow::bin::move_to_bin(&state.pool, &state.events, id).await?;
    Ok(ApiResponse::message("Customer moved to bin"))
}
