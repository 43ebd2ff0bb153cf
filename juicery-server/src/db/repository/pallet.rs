//! Pallet Repository

use super::{RepoError, RepoResult, placeholders};
use shared::models::{LocationStatus, Pallet};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const SELECT: &str = "SELECT p.id, p.qr_code, p.status, p.capacity, \
                      (SELECT COUNT(*) FROM pallet_crate_mapping m WHERE m.pallet_id = p.id) AS holding, \
                      p.created_at, p.updated_at \
                      FROM pallets p";

/// Pallet row taken under the write lock
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LockedPallet {
    pub id: i64,
    pub capacity: i64,
    pub status: LocationStatus,
}

/// Pallet as seen by a shelf scan: where it currently sits
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PalletPlacement {
    pub id: i64,
    pub qr_code: String,
    pub shelf_id: Option<i64>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Pallet>> {
    let sql = format!("{SELECT} ORDER BY p.id DESC");
    let pallets = sqlx::query_as::<_, Pallet>(&sql).fetch_all(pool).await?;
    Ok(pallets)
}

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Pallet>> {
    let sql = format!("{SELECT} WHERE p.id = ?");
    let pallet = sqlx::query_as::<_, Pallet>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(pallet)
}

pub async fn find_by_qr<'e>(exec: impl SqliteExecutor<'e>, qr_code: &str) -> RepoResult<Option<Pallet>> {
    let sql = format!("{SELECT} WHERE p.qr_code = ?");
    let pallet = sqlx::query_as::<_, Pallet>(&sql)
        .bind(qr_code)
        .fetch_optional(exec)
        .await?;
    Ok(pallet)
}

/// Register a new open pallet
pub async fn create(pool: &SqlitePool, qr_code: &str, capacity: i64, now: i64) -> RepoResult<Pallet> {
    if capacity <= 0 {
        return Err(RepoError::Validation("Pallet capacity must be positive".into()));
    }
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO pallets (qr_code, status, capacity, created_at, updated_at) \
         VALUES (?, 'open', ?, ?, ?) RETURNING id",
    )
    .bind(qr_code)
    .bind(capacity)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pallet".into()))
}

/// Take the write lock on a pallet by QR; `None` when the QR is unknown
pub async fn lock_by_qr(
    conn: &mut SqliteConnection,
    qr_code: &str,
    now: i64,
) -> RepoResult<Option<LockedPallet>> {
    let locked = sqlx::query_as::<_, LockedPallet>(
        "UPDATE pallets SET updated_at = ? WHERE qr_code = ? RETURNING id, capacity, status",
    )
    .bind(now)
    .bind(qr_code)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(locked)
}

/// Number of crates mapped to the pallet
pub async fn holding<'e>(exec: impl SqliteExecutor<'e>, pallet_id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pallet_crate_mapping WHERE pallet_id = ?")
            .bind(pallet_id)
            .fetch_one(exec)
            .await?;
    Ok(count)
}

pub async fn insert_mapping<'e>(
    exec: impl SqliteExecutor<'e>,
    pallet_id: i64,
    crate_id: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO pallet_crate_mapping (pallet_id, crate_id, created_at) VALUES (?, ?, ?)")
        .bind(pallet_id)
        .bind(crate_id)
        .bind(now)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn set_status<'e>(
    exec: impl SqliteExecutor<'e>,
    pallet_id: i64,
    status: LocationStatus,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE pallets SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(pallet_id)
        .execute(exec)
        .await?;
    Ok(())
}

/// Reopen full pallets that lost crates (after a purge)
pub async fn reopen_underfilled<'e>(exec: impl SqliteExecutor<'e>, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE pallets SET status = 'open', updated_at = ? \
         WHERE status = 'full' \
           AND (SELECT COUNT(*) FROM pallet_crate_mapping m WHERE m.pallet_id = pallets.id) < capacity",
    )
    .bind(now)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected())
}

/// Pallets on a shelf, in placement order
pub async fn find_by_shelf(pool: &SqlitePool, shelf_id: i64) -> RepoResult<Vec<Pallet>> {
    let sql = format!(
        "{SELECT} JOIN shelf_pallet_mapping sm ON sm.pallet_id = p.id WHERE sm.shelf_id = ? ORDER BY sm.id"
    );
    let pallets = sqlx::query_as::<_, Pallet>(&sql)
        .bind(shelf_id)
        .fetch_all(pool)
        .await?;
    Ok(pallets)
}

/// Resolve pallet QRs and their current shelf; unknown QRs are simply absent
pub async fn find_placements(
    conn: &mut SqliteConnection,
    qr_codes: &[String],
) -> RepoResult<Vec<PalletPlacement>> {
    if qr_codes.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT p.id, p.qr_code, sm.shelf_id \
         FROM pallets p LEFT JOIN shelf_pallet_mapping sm ON sm.pallet_id = p.id \
         WHERE p.qr_code IN ({})",
        placeholders(qr_codes.len())
    );
    let mut query = sqlx::query_as::<_, PalletPlacement>(&sql);
    for qr in qr_codes {
        query = query.bind(qr);
    }
    let found = query.fetch_all(&mut *conn).await?;
    Ok(found)
}
