//! Shelf assignment
//!
//! Same flow as pallet assignment one level up: pallets onto a shelf. Shelf
//! placement never changes order status.

use std::collections::HashMap;

use shared::message::ServerEvent;
use shared::models::{AssignShelfRequest, AssignShelfResult, LocationStatus};
use sqlx::SqlitePool;
use tracing::instrument;

use super::pallet::normalize_codes;
use crate::db::repository::{pallet, shelf};
use crate::events::EventBus;
use crate::utils::{AppError, ErrorCode, ServiceResult};

#[instrument(skip(pool, events, req), fields(shelf = %req.shelf_id, pallets = req.pallet_ids.len()))]
pub async fn assign_pallets_to_shelf(
    pool: &SqlitePool,
    events: &EventBus,
    req: &AssignShelfRequest,
) -> ServiceResult<AssignShelfResult> {
    let shelf_qr = req.shelf_id.trim();
    if shelf_qr.is_empty() {
        return Err(AppError::validation("shelf_id is required").with_detail("field", "shelf_id").into());
    }
    let pallet_qrs = normalize_codes(&req.pallet_ids);
    if pallet_qrs.is_empty() {
        return Err(AppError::validation("pallet_ids must not be empty").with_detail("field", "pallet_ids").into());
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let locked = shelf::lock_by_qr(&mut tx, shelf_qr, now)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShelfNotFound).with_detail("shelf_id", shelf_qr))?;

    let found = pallet::find_placements(&mut tx, &pallet_qrs).await?;
    let by_qr: HashMap<&str, &pallet::PalletPlacement> =
        found.iter().map(|p| (p.qr_code.as_str(), p)).collect();

    let mut to_map = Vec::new();
    let mut already_mapped = Vec::new();
    let mut unresolved = Vec::new();

    for qr in &pallet_qrs {
        let Some(placement) = by_qr.get(qr.as_str()) else {
            unresolved.push(qr.clone());
            continue;
        };
        match placement.shelf_id {
            Some(id) if id == locked.id => already_mapped.push(qr.clone()),
            Some(other) => {
                return Err(AppError::new(ErrorCode::PalletOnOtherShelf)
                    .with_detail("pallet_id", qr.as_str())
                    .with_detail("shelf_id", other)
                    .into());
            }
            None => to_map.push(*placement),
        }
    }

    let holding = shelf::holding(&mut *tx, locked.id).await?;
    let after = holding + to_map.len() as i64;
    if after > locked.capacity {
        return Err(AppError::new(ErrorCode::ShelfCapacityExceeded)
            .with_detail("shelf_id", shelf_qr)
            .with_detail("capacity", locked.capacity)
            .with_detail("holding", holding)
            .with_detail("requested", to_map.len())
            .into());
    }

    for placement in &to_map {
        shelf::insert_mapping(&mut *tx, locked.id, placement.id, now).await?;
    }

    let became_full = locked.status == LocationStatus::Open
        && LocationStatus::for_holding(after, locked.capacity) == LocationStatus::Full;
    if became_full {
        shelf::set_status(&mut *tx, locked.id, LocationStatus::Full, now).await?;
    }

    tx.commit().await?;

    tracing::info!(
        shelf = %shelf_qr,
        mapped = to_map.len(),
        already_mapped = already_mapped.len(),
        unresolved = unresolved.len(),
        holding = after,
        "Pallets assigned to shelf"
    );

    if became_full {
        events.publish(ServerEvent::ShelfFull {
            shelf_id: shelf_qr.to_string(),
        });
    }

    Ok(AssignShelfResult {
        shelf_id: shelf_qr.to_string(),
        mapped: to_map.iter().map(|p| p.qr_code.clone()).collect(),
        already_mapped,
        unresolved,
        shelf_status: if became_full { LocationStatus::Full } else { locked.status },
    })
}
