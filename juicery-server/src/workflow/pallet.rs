//! Pallet assignment
//!
//! A scanner posts one pallet QR and a batch of crate QRs. Inside a single
//! transaction the pallet row is locked first, the crates are mapped, and
//! every order touched by the batch is re-checked for completeness. Events
//! go out only after commit.

use std::collections::{BTreeSet, HashMap, HashSet};

use shared::message::ServerEvent;
use shared::models::{AssignPalletRequest, AssignPalletResult, LocationStatus};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::db::repository::{crates, order, pallet};
use crate::events::EventBus;
use crate::utils::{AppError, ErrorCode, ServiceResult};

/// Trimmed, non-blank QR codes in first-seen order without duplicates
pub(crate) fn normalize_codes(codes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_string()))
        .map(str::to_string)
        .collect()
}

/// Map scanned crates onto a pallet
///
/// - unknown pallet QR: `PalletNotFound`, nothing written
/// - unknown crate QRs: skipped and reported as `unresolved`
/// - crate already on this pallet: skipped and reported as `already_mapped`
/// - crate on another pallet: `CrateOnOtherPallet`, whole batch rolled back
/// - more crates than the pallet has room for: `PalletCapacityExceeded`
#[instrument(skip(pool, events, req), fields(pallet = %req.pallet_id, crates = req.crate_ids.len()))]
pub async fn assign_crates_to_pallet(
    pool: &SqlitePool,
    events: &EventBus,
    req: &AssignPalletRequest,
) -> ServiceResult<AssignPalletResult> {
    let pallet_qr = req.pallet_id.trim();
    if pallet_qr.is_empty() {
        return Err(AppError::validation("pallet_id is required").with_detail("field", "pallet_id").into());
    }
    let crate_qrs = normalize_codes(&req.crate_ids);
    if crate_qrs.is_empty() {
        return Err(AppError::validation("crate_ids must not be empty").with_detail("field", "crate_ids").into());
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let locked = pallet::lock_by_qr(&mut tx, pallet_qr, now).await?.ok_or_else(|| {
        AppError::new(ErrorCode::PalletNotFound).with_detail("pallet_id", pallet_qr)
    })?;

    let found = crates::find_placements(&mut tx, &crate_qrs).await?;
    let by_qr: HashMap<&str, &crates::CratePlacement> =
        found.iter().map(|c| (c.qr_code.as_str(), c)).collect();

    let mut to_map = Vec::new();
    let mut already_mapped = Vec::new();
    let mut unresolved = Vec::new();
    let mut touched_orders = BTreeSet::new();

    for qr in &crate_qrs {
        let Some(placement) = by_qr.get(qr.as_str()) else {
            unresolved.push(qr.clone());
            continue;
        };
        touched_orders.insert(placement.order_id);
        match placement.pallet_id {
            Some(id) if id == locked.id => already_mapped.push(qr.clone()),
            Some(other) => {
                return Err(AppError::new(ErrorCode::CrateOnOtherPallet)
                    .with_detail("crate_id", qr.as_str())
                    .with_detail("pallet_id", other)
                    .into());
            }
            None => to_map.push(*placement),
        }
    }

    let holding = pallet::holding(&mut *tx, locked.id).await?;
    let after = holding + to_map.len() as i64;
    if after > locked.capacity {
        return Err(AppError::new(ErrorCode::PalletCapacityExceeded)
            .with_detail("pallet_id", pallet_qr)
            .with_detail("capacity", locked.capacity)
            .with_detail("holding", holding)
            .with_detail("requested", to_map.len())
            .into());
    }

    for placement in &to_map {
        pallet::insert_mapping(&mut *tx, locked.id, placement.id, now).await?;
    }

    let mut ready_orders = Vec::new();
    for order_id in touched_orders {
        if order::mark_ready_if_complete(&mut *tx, order_id, now).await? {
            ready_orders.push(order_id);
        }
    }

    let pallet_status = LocationStatus::for_holding(after, locked.capacity);
    let became_full = pallet_status == LocationStatus::Full && locked.status == LocationStatus::Open;
    if became_full {
        pallet::set_status(&mut *tx, locked.id, LocationStatus::Full, now).await?;
    }

    tx.commit().await?;

    tracing::info!(
        pallet = %pallet_qr,
        mapped = to_map.len(),
        already_mapped = already_mapped.len(),
        unresolved = unresolved.len(),
        holding = after,
        "Crates assigned to pallet"
    );

    events.publish_all(ready_orders.iter().map(|&order_id| ServerEvent::OrderReady { order_id }));
    if became_full {
        events.publish(ServerEvent::PalletFull {
            pallet_id: pallet_qr.to_string(),
        });
    }

    Ok(AssignPalletResult {
        pallet_id: pallet_qr.to_string(),
        mapped: to_map.iter().map(|c| c.qr_code.clone()).collect(),
        already_mapped,
        unresolved,
        ready_orders,
        pallet_status: if became_full { LocationStatus::Full } else { locked.status },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_codes_keeps_first_seen_order() {
        let codes = vec![
            " CRATE_b".to_string(),
            "CRATE_a".to_string(),
            "".to_string(),
            "CRATE_b".to_string(),
        ];
        assert_eq!(normalize_codes(&codes), vec!["CRATE_b", "CRATE_a"]);
    }
}
