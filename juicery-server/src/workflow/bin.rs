//! Customer bin: logical delete, restore and permanent purge

use shared::message::ServerEvent;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::db::repository::{customer, order, pallet};
use crate::events::EventBus;
use crate::utils::{AppError, ErrorCode, ServiceResult};

/// Move an active customer and all their live orders to the bin
///
/// Orders remember their status so [`restore`] can put them back. Crates and
/// pallet mappings are left untouched.
#[instrument(skip(pool, events))]
pub async fn move_to_bin(pool: &SqlitePool, events: &EventBus, customer_id: i64) -> ServiceResult<u64> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    if !customer::mark_binned(&mut *tx, customer_id, now).await? {
        return Err(match customer::find_by_id(&mut *tx, customer_id).await? {
            None => AppError::customer_not_found(customer_id),
            Some(_) => AppError::new(ErrorCode::CustomerAlreadyDeleted).with_detail("customer_id", customer_id),
        }
        .into());
    }
    let orders = order::bin_for_customer(&mut *tx, customer_id, now).await?;
    tx.commit().await?;

    tracing::info!(customer_id, orders, "Customer moved to bin");
    events.publish(ServerEvent::CustomersUpdated);
    Ok(orders)
}

/// Bring a binned customer back, each order to its status before binning
///
/// Crates may have been mapped while the order sat in the bin; an order whose
/// crates are now all on pallets comes back as `ready-for-pickup` and emits
/// `orderReady`.
#[instrument(skip(pool, events))]
pub async fn restore(pool: &SqlitePool, events: &EventBus, customer_id: i64) -> ServiceResult<u64> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    if !customer::mark_restored(&mut *tx, customer_id).await? {
        return Err(not_in_bin(&mut tx, customer_id).await?.into());
    }
    let restored = order::restore_for_customer(&mut *tx, customer_id, now).await?;
    let mut ready = Vec::new();
    for &order_id in &restored {
        if order::mark_ready_if_complete(&mut *tx, order_id, now).await? {
            ready.push(order_id);
        }
    }
    tx.commit().await?;

    tracing::info!(customer_id, orders = restored.len(), ready = ready.len(), "Customer restored from bin");
    events.publish_all(ready.into_iter().map(|order_id| ServerEvent::OrderReady { order_id }));
    events.publish(ServerEvent::CustomersUpdated);
    Ok(restored.len() as u64)
}

/// Permanently delete a binned customer
///
/// Orders, crates and their mappings go with it. Pallets that were full and
/// lost crates are reopened.
#[instrument(skip(pool, events))]
pub async fn purge(pool: &SqlitePool, events: &EventBus, customer_id: i64) -> ServiceResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    if !customer::purge(&mut *tx, customer_id).await? {
        return Err(not_in_bin(&mut tx, customer_id).await?.into());
    }
    let reopened = pallet::reopen_underfilled(&mut *tx, now).await?;
    tx.commit().await?;

    tracing::info!(customer_id, reopened_pallets = reopened, "Customer purged");
    events.publish(ServerEvent::CustomersUpdated);
    Ok(())
}

async fn not_in_bin(conn: &mut sqlx::SqliteConnection, customer_id: i64) -> ServiceResult<AppError> {
    let err = match customer::find_by_id(&mut *conn, customer_id).await? {
        None => AppError::customer_not_found(customer_id),
        Some(_) => AppError::new(ErrorCode::CustomerNotInBin).with_detail("customer_id", customer_id),
    };
    Ok(err)
}
