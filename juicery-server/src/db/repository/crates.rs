//! Crate Repository

use super::{RepoResult, placeholders};
use shared::models::{Crate, CrateLookup, CrateWithPallet};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, order_id, pouch_count, qr_code, created_at";

/// Crate as seen by a pallet scan: where it currently sits
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CratePlacement {
    pub id: i64,
    pub order_id: i64,
    pub qr_code: String,
    pub pallet_id: Option<i64>,
}

pub async fn insert<'e>(
    exec: impl SqliteExecutor<'e>,
    order_id: i64,
    pouch_count: i64,
    qr_code: &str,
    now: i64,
) -> RepoResult<Crate> {
    let sql = format!(
        "INSERT INTO crates (order_id, pouch_count, qr_code, created_at) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let c = sqlx::query_as::<_, Crate>(&sql)
        .bind(order_id)
        .bind(pouch_count)
        .bind(qr_code)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(c)
}

/// Crates of an order with the QR of their pallet, in creation order
pub async fn find_by_order<'e>(
    exec: impl SqliteExecutor<'e>,
    order_id: i64,
) -> RepoResult<Vec<CrateWithPallet>> {
    let crates = sqlx::query_as::<_, CrateWithPallet>(
        "SELECT c.id, c.order_id, c.pouch_count, c.qr_code, c.created_at, p.qr_code AS pallet_qr \
         FROM crates c \
         LEFT JOIN pallet_crate_mapping m ON m.crate_id = c.id \
         LEFT JOIN pallets p ON p.id = m.pallet_id \
         WHERE c.order_id = ? ORDER BY c.id",
    )
    .bind(order_id)
    .fetch_all(exec)
    .await?;
    Ok(crates)
}

/// Crates currently mapped to a pallet, in scan order
pub async fn find_by_pallet(pool: &SqlitePool, pallet_id: i64) -> RepoResult<Vec<Crate>> {
    let crates = sqlx::query_as::<_, Crate>(
        "SELECT c.id, c.order_id, c.pouch_count, c.qr_code, c.created_at \
         FROM pallet_crate_mapping m JOIN crates c ON c.id = m.crate_id \
         WHERE m.pallet_id = ? ORDER BY m.id",
    )
    .bind(pallet_id)
    .fetch_all(pool)
    .await?;
    Ok(crates)
}

/// Resolve a scanned crate QR to its order, customer and location
pub async fn lookup(pool: &SqlitePool, qr_code: &str) -> RepoResult<Option<CrateLookup>> {
    let found = sqlx::query_as::<_, CrateLookup>(
        "SELECT c.id, c.qr_code, c.pouch_count, c.order_id, o.status AS order_status, \
                o.customer_id, cu.name AS customer_name, \
                p.qr_code AS pallet_qr, s.qr_code AS shelf_qr \
         FROM crates c \
         JOIN orders o ON o.id = c.order_id \
         JOIN customers cu ON cu.id = o.customer_id \
         LEFT JOIN pallet_crate_mapping m ON m.crate_id = c.id \
         LEFT JOIN pallets p ON p.id = m.pallet_id \
         LEFT JOIN shelf_pallet_mapping sm ON sm.pallet_id = p.id \
         LEFT JOIN shelves s ON s.id = sm.shelf_id \
         WHERE c.qr_code = ?",
    )
    .bind(qr_code)
    .fetch_optional(pool)
    .await?;
    Ok(found)
}

/// Resolve crate QRs and their current pallet; unknown QRs are simply absent
pub async fn find_placements(
    conn: &mut SqliteConnection,
    qr_codes: &[String],
) -> RepoResult<Vec<CratePlacement>> {
    if qr_codes.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT c.id, c.order_id, c.qr_code, m.pallet_id \
         FROM crates c LEFT JOIN pallet_crate_mapping m ON m.crate_id = c.id \
         WHERE c.qr_code IN ({})",
        placeholders(qr_codes.len())
    );
    let mut query = sqlx::query_as::<_, CratePlacement>(&sql);
    for qr in qr_codes {
        query = query.bind(qr);
    }
    let found = query.fetch_all(&mut *conn).await?;
    Ok(found)
}
