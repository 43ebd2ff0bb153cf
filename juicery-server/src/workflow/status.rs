//! Explicit order status transitions
//!
//! | Operation | From | To | Event |
//! |-----------|------|----|-------|
//! | [`start_processing`] | pending | processing | `orderProcessing` |
//! | [`mark_done`] | processing | loading | `order-status-updated` |
//! | [`confirm_pickup`] | ready-for-pickup | picked-up | `order-status-updated` |
//!
//! The transition to ready-for-pickup is derived from pallet mappings, see
//! [`super::pallet`].

use shared::message::ServerEvent;
use shared::models::{Order, OrderStatus};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::db::repository::order;
use crate::events::EventBus;
use crate::utils::{AppError, ErrorCode, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Started,
    /// Order was already processing; nothing written, nothing emitted
    AlreadyProcessing,
}

impl ProcessingOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ProcessingOutcome::Started => "Order moved to processing",
            ProcessingOutcome::AlreadyProcessing => "Order already processing",
        }
    }
}

/// pending → processing, guarded by crate completeness
///
/// The crates registered for the order must add up to its pouch total,
/// recomputed from the rows.
#[instrument(skip(pool, events))]
pub async fn start_processing(
    pool: &SqlitePool,
    events: &EventBus,
    order_id: i64,
) -> ServiceResult<ProcessingOutcome> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let current = locked_order(&mut tx, order_id).await?;
    match current.status {
        OrderStatus::Pending => {}
        OrderStatus::Processing => return Ok(ProcessingOutcome::AlreadyProcessing),
        other => {
            return Err(AppError::invalid_transition(other.as_str(), OrderStatus::Processing.as_str()).into());
        }
    }

    let registered = order::crate_pouch_sum(&mut *tx, order_id).await?;
    if registered != current.total_pouches {
        tracing::warn!(
            order_id,
            registered,
            expected = current.total_pouches,
            "Processing refused, crates incomplete"
        );
        return Err(AppError::new(ErrorCode::OrderCratesIncomplete)
            .with_detail("order_id", order_id)
            .with_detail("registered_pouches", registered)
            .with_detail("total_pouches", current.total_pouches)
            .into());
    }

    order::transition(&mut *tx, order_id, OrderStatus::Pending, OrderStatus::Processing, now).await?;
    tx.commit().await?;

    tracing::info!(order_id, "Order processing");
    events.publish(ServerEvent::OrderProcessing { order_id });
    Ok(ProcessingOutcome::Started)
}

/// processing → loading, storing the operator comment when given
#[instrument(skip(pool, events, comment))]
pub async fn mark_done(
    pool: &SqlitePool,
    events: &EventBus,
    order_id: i64,
    comment: Option<&str>,
) -> ServiceResult<()> {
    let now = shared::util::now_millis();
    let comment = comment.map(str::trim).filter(|c| !c.is_empty());
    let mut tx = pool.begin().await?;

    let current = locked_order(&mut tx, order_id).await?;
    if !order::mark_loading(&mut *tx, order_id, comment, now).await? {
        return Err(
            AppError::invalid_transition(current.status.as_str(), OrderStatus::Loading.as_str()).into(),
        );
    }
    tx.commit().await?;

    tracing::info!(order_id, "Order loading");
    events.publish(ServerEvent::OrderStatusUpdated {
        order_id,
        status: OrderStatus::Loading,
    });
    Ok(())
}

/// ready-for-pickup → picked-up
#[instrument(skip(pool, events))]
pub async fn confirm_pickup(pool: &SqlitePool, events: &EventBus, order_id: i64) -> ServiceResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let current = locked_order(&mut tx, order_id).await?;
    if !order::mark_picked_up(&mut *tx, order_id, now).await? {
        return Err(
            AppError::invalid_transition(current.status.as_str(), OrderStatus::PickedUp.as_str()).into(),
        );
    }
    tx.commit().await?;

    tracing::info!(order_id, "Order picked up");
    events.publish(ServerEvent::OrderStatusUpdated {
        order_id,
        status: OrderStatus::PickedUp,
    });
    Ok(())
}

async fn locked_order(conn: &mut sqlx::SqliteConnection, order_id: i64) -> ServiceResult<Order> {
    order::lock(conn, order_id)
        .await?
        .ok_or_else(|| AppError::order_not_found(order_id).into())
}
