//! Order API Handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::{crates, customer, order};
use crate::notify;
use crate::printing::LabelPrintResult;
use crate::utils::{ApiResponse, AppError, AppResult};
use crate::workflow;
use shared::models::{OrderDetail, OrderDoneRequest, OrderListQuery, OrderStatus, OrderSummary};

/// GET /api/orders?status=X - orders with customer name and phone
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<ApiResponse<Vec<OrderSummary>>> {
    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(s.parse::<OrderStatus>().map_err(|_| {
            AppError::validation(format!("Unknown order status: {s}")).with_detail("status", s)
        })?),
        None => None,
    };
    let orders = order::list(&state.pool, status).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{id} - order with customer and crates
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<OrderDetail>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::order_not_found(id))?;
    let customer = customer::get(&state.pool, order.customer_id).await?;
    let crates = crates::find_by_order(&state.pool, id).await?;
    let mapped_crates = crates.iter().filter(|c| c.pallet_qr.is_some()).count() as i64;
    Ok(ApiResponse::success(OrderDetail {
        order,
        customer,
        crates,
        mapped_crates,
    }))
}

/// POST /api/orders/{id}/processing
pub async fn processing(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<ApiResponse<()>> {
    let outcome = workflow::start_processing(&state.pool, &state.events, id).await?;
    Ok(ApiResponse::message(outcome.message()))
}

/// POST /api/orders/{id}/done - processing → loading, optional `{comment}`
pub async fn done(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> AppResult<ApiResponse<()>> {
    let req: OrderDoneRequest = if body.iter().all(u8::is_ascii_whitespace) {
        OrderDoneRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_request(format!("Invalid body: {e}")))?
    };
    workflow::mark_done(&state.pool, &state.events, id, req.comment.as_deref()).await?;
    Ok(ApiResponse::message("Order moved to loading"))
}

/// POST /api/orders/{id}/pickup
pub async fn pickup(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<ApiResponse<()>> {
    workflow::confirm_pickup(&state.pool, &state.events, id).await?;
    Ok(ApiResponse::message("Order picked up"))
}

/// POST /api/orders/{id}/notify - "ready for pickup" SMS
pub async fn notify(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<ApiResponse<()>> {
    notify::notify_order_ready(&state.pool, state.sms.as_ref(), id).await?;
    Ok(ApiResponse::message("Customer notified"))
}

/// POST /api/orders/{id}/label
pub async fn label(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<LabelPrintResult>> {
    let result = state.printer.print_order_label(&state.pool, id).await?;
    let message = if result.assumed {
        "Label sent, printer did not confirm"
    } else {
        "Label printed"
    };
    Ok(ApiResponse::success_with_message(message, result))
}
