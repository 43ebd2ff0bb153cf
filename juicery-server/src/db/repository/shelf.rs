//! Shelf Repository

use super::{RepoError, RepoResult};
use shared::models::{LocationStatus, Shelf};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const SELECT: &str = "SELECT s.id, s.qr_code, s.status, s.capacity, \
                      (SELECT COUNT(*) FROM shelf_pallet_mapping m WHERE m.shelf_id = s.id) AS holding, \
                      s.created_at, s.updated_at \
                      FROM shelves s";

/// Shelf row taken under the write lock
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LockedShelf {
    pub id: i64,
    pub capacity: i64,
    pub status: LocationStatus,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Shelf>> {
    let sql = format!("{SELECT} ORDER BY s.id DESC");
    let shelves = sqlx::query_as::<_, Shelf>(&sql).fetch_all(pool).await?;
    Ok(shelves)
}

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Shelf>> {
    let sql = format!("{SELECT} WHERE s.id = ?");
    let shelf = sqlx::query_as::<_, Shelf>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(shelf)
}

pub async fn create(pool: &SqlitePool, qr_code: &str, capacity: i64, now: i64) -> RepoResult<Shelf> {
    if capacity <= 0 {
        return Err(RepoError::Validation("Shelf capacity must be positive".into()));
    }
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shelves (qr_code, status, capacity, created_at, updated_at) \
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
        .ok_or_else(|| RepoError::Database("Failed to create shelf".into()))
}

/// Take the write lock on a shelf by QR; `None` when the QR is unknown
pub async fn lock_by_qr(
    conn: &mut SqliteConnection,
    qr_code: &str,
    now: i64,
) -> RepoResult<Option<LockedShelf>> {
    let locked = sqlx::query_as::<_, LockedShelf>(
        "UPDATE shelves SET updated_at = ? WHERE qr_code = ? RETURNING id, capacity, status",
    )
    .bind(now)
    .bind(qr_code)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(locked)
}

/// Number of pallets mapped to the shelf
pub async fn holding<'e>(exec: impl SqliteExecutor<'e>, shelf_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shelf_pallet_mapping WHERE shelf_id = ?")
        .bind(shelf_id)
        .fetch_one(exec)
        .await?;
    Ok(count)
}

pub async fn insert_mapping<'e>(
    exec: impl SqliteExecutor<'e>,
    shelf_id: i64,
    pallet_id: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO shelf_pallet_mapping (shelf_id, pallet_id, created_at) VALUES (?, ?, ?)")
        .bind(shelf_id)
        .bind(pallet_id)
        .bind(now)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn set_status<'e>(
    exec: impl SqliteExecutor<'e>,
    shelf_id: i64,
    status: LocationStatus,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE shelves SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(shelf_id)
        .execute(exec)
        .await?;
    Ok(())
}
