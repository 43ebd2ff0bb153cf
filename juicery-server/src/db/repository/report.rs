//! Report Repository
//!
//! Read-only aggregates for the admin dashboard.

use super::RepoResult;
use shared::models::{DailyIntake, ReportSummary, StatusCount};
use sqlx::SqlitePool;

pub async fn status_counts(pool: &SqlitePool) -> RepoResult<Vec<StatusCount>> {
    let rows = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS orders, COALESCE(SUM(total_pouches), 0) AS pouches \
         FROM orders GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Counts across orders, crates, pallets, shelves and customers
pub async fn summary(pool: &SqlitePool) -> RepoResult<ReportSummary> {
    let orders_by_status = status_counts(pool).await?;
    let pouches_of = |statuses: &[&str]| -> i64 {
        orders_by_status
            .iter()
            .filter(|row| statuses.contains(&row.status.as_str()))
            .map(|row| row.pouches)
            .sum()
    };
    let pouches_pending = pouches_of(&["pending"]);
    let pouches_in_flight = pouches_of(&["processing", "loading"]);
    let pouches_ready = pouches_of(&["ready-for-pickup"]);

    let (crates_total, crates_mapped): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM crates), (SELECT COUNT(*) FROM pallet_crate_mapping)",
    )
    .fetch_one(pool)
    .await?;

    let (pallets_open, pallets_full): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(status = 'open'), 0), COALESCE(SUM(status = 'full'), 0) FROM pallets",
    )
    .fetch_one(pool)
    .await?;

    let (shelves_open, shelves_full): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(status = 'open'), 0), COALESCE(SUM(status = 'full'), 0) FROM shelves",
    )
    .fetch_one(pool)
    .await?;

    let (customers_active, customers_binned): (i64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(deleted_at IS NULL), 0), COALESCE(SUM(deleted_at IS NOT NULL), 0) FROM customers",
    )
    .fetch_one(pool)
    .await?;

    Ok(ReportSummary {
        orders_by_status,
        pouches_pending,
        pouches_in_flight,
        pouches_ready,
        crates_total,
        crates_mapped,
        pallets_open,
        pallets_full,
        shelves_open,
        shelves_full,
        customers_active,
        customers_binned,
    })
}

/// Orders and pouches per UTC intake day in `[from_ms, to_ms)`, bin excluded
pub async fn daily_intake(pool: &SqlitePool, from_ms: i64, to_ms: i64) -> RepoResult<Vec<DailyIntake>> {
    let rows = sqlx::query_as::<_, DailyIntake>(
        "SELECT strftime('%Y-%m-%d', created_at / 1000, 'unixepoch') AS day, \
                COUNT(*) AS orders, COALESCE(SUM(total_pouches), 0) AS pouches \
         FROM orders \
         WHERE created_at >= ? AND created_at < ? AND status != 'deleted' \
         GROUP BY day ORDER BY day",
    )
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_summary_on_empty_database() {
        let db = DbService::in_memory().await.unwrap();
        let s = summary(&db.pool).await.unwrap();
        assert!(s.orders_by_status.is_empty());
        assert_eq!(s.crates_total, 0);
        assert_eq!(s.pallets_full, 0);
        assert_eq!(s.customers_active, 0);
    }

    #[tokio::test]
    async fn test_daily_groups_by_utc_day() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query("INSERT INTO customers (id, name, phone, created_at) VALUES (1, 'A', '1', 0)")
            .execute(&db.pool)
            .await
            .unwrap();
        // 2024-09-14 00:00 UTC = 1726272000000
        for (pouches, at) in [(8, 1_726_272_000_000_i64), (5, 1_726_300_000_000), (3, 1_726_358_400_000)] {
            sqlx::query(
                "INSERT INTO orders (customer_id, total_pouches, created_at, updated_at) VALUES (1, ?, ?, ?)",
            )
            .bind(pouches)
            .bind(at)
            .bind(at)
            .execute(&db.pool)
            .await
            .unwrap();
        }

        let rows = daily_intake(&db.pool, 1_726_272_000_000, 1_726_444_800_000)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day, "2024-09-14");
        assert_eq!(rows[0].orders, 2);
        assert_eq!(rows[0].pouches, 13);
        assert_eq!(rows[1].day, "2024-09-15");
        assert_eq!(rows[1].pouches, 3);
    }
}
