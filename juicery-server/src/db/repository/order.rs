//! Order Repository
//!
//! Status writes are conditional on the current status so the caller can tell
//! from the affected row count whether a transition happened.

use super::RepoResult;
use shared::models::{Order, OrderStatus, OrderSummary};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, customer_id, total_pouches, weight_kg, status, status_before_delete, \
                       comment, created_at, updated_at, ready_at, picked_up_at";

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(order)
}

pub async fn find_by_customer<'e>(
    exec: impl SqliteExecutor<'e>,
    customer_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql =
        format!("SELECT {COLUMNS} FROM orders WHERE customer_id = ? ORDER BY created_at DESC, id DESC");
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_all(exec)
        .await?;
    Ok(orders)
}

/// Orders joined with their customer, newest first
///
/// Without a status filter, orders in the bin are left out.
pub async fn list(pool: &SqlitePool, status: Option<OrderStatus>) -> RepoResult<Vec<OrderSummary>> {
    let orders = sqlx::query_as::<_, OrderSummary>(
        "SELECT o.id, o.customer_id, c.name AS customer_name, c.phone AS customer_phone, \
                o.total_pouches, o.status, o.comment, o.created_at, \
                (SELECT COUNT(*) FROM crates cr WHERE cr.order_id = o.id) AS crate_count, \
                (SELECT COUNT(*) FROM crates cr JOIN pallet_crate_mapping m ON m.crate_id = cr.id \
                  WHERE cr.order_id = o.id) AS mapped_crates \
         FROM orders o JOIN customers c ON c.id = o.customer_id \
         WHERE (?1 IS NULL AND o.status != 'deleted') OR o.status = ?1 \
         ORDER BY o.created_at DESC, o.id DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub struct OrderInsert<'a> {
    pub customer_id: i64,
    pub total_pouches: i64,
    pub weight_kg: Option<f64>,
    pub comment: Option<&'a str>,
}

/// Insert a new order in `pending`
pub async fn insert<'e>(
    exec: impl SqliteExecutor<'e>,
    data: OrderInsert<'_>,
    now: i64,
) -> RepoResult<Order> {
    let sql = format!(
        "INSERT INTO orders (customer_id, total_pouches, weight_kg, status, comment, created_at, updated_at) \
         VALUES (?, ?, ?, 'pending', ?, ?, ?) RETURNING {COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(data.customer_id)
        .bind(data.total_pouches)
        .bind(data.weight_kg)
        .bind(data.comment)
        .bind(now)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(order)
}

/// Take the write lock on an order row and return its current state
///
/// A no-op write as the first statement makes SQLite grant the transaction
/// the write lock before anything is read.
pub async fn lock(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("UPDATE orders SET updated_at = updated_at WHERE id = ? RETURNING {COLUMNS}");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

/// Move `from` → `to`; false when the order was not in `from`
pub async fn transition<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(now)
        .bind(id)
        .bind(from)
        .execute(exec)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// processing → loading, storing the comment when one is given
pub async fn mark_loading<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    comment: Option<&str>,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = 'loading', comment = COALESCE(?, comment), updated_at = ? \
         WHERE id = ? AND status = 'processing'",
    )
    .bind(comment)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// ready-for-pickup → picked-up
pub async fn mark_picked_up<'e>(exec: impl SqliteExecutor<'e>, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = 'picked-up', picked_up_at = ?, updated_at = ? \
         WHERE id = ? AND status = 'ready-for-pickup'",
    )
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Flip to ready-for-pickup when every crate of the order is on a pallet
///
/// Only pending, processing and loading orders qualify. Returns whether the
/// order flipped.
pub async fn mark_ready_if_complete<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = 'ready-for-pickup', ready_at = ?1, updated_at = ?1 \
         WHERE id = ?2 \
           AND status IN ('pending', 'processing', 'loading') \
           AND (SELECT COUNT(*) FROM crates WHERE order_id = ?2) > 0 \
           AND (SELECT COUNT(*) FROM crates WHERE order_id = ?2) = \
               (SELECT COUNT(*) FROM crates c JOIN pallet_crate_mapping m ON m.crate_id = c.id \
                 WHERE c.order_id = ?2)",
    )
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Park every live order of a customer in `deleted`, remembering its status
pub async fn bin_for_customer<'e>(
    exec: impl SqliteExecutor<'e>,
    customer_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET status_before_delete = status, status = 'deleted', updated_at = ? \
         WHERE customer_id = ? AND status != 'deleted'",
    )
    .bind(now)
    .bind(customer_id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected())
}

/// Put binned orders of a customer back into their previous status
///
/// Returns the ids of the restored orders.
pub async fn restore_for_customer<'e>(
    exec: impl SqliteExecutor<'e>,
    customer_id: i64,
    now: i64,
) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "UPDATE orders SET status = COALESCE(status_before_delete, 'pending'), \
                status_before_delete = NULL, updated_at = ? \
         WHERE customer_id = ? AND status = 'deleted' \
         RETURNING id",
    )
    .bind(now)
    .bind(customer_id)
    .fetch_all(exec)
    .await?;
    Ok(ids)
}

/// Sum of `pouch_count` over the order's crates
pub async fn crate_pouch_sum<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<i64> {
    let sum: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(pouch_count), 0) FROM crates WHERE order_id = ?")
            .bind(id)
            .fetch_one(exec)
            .await?;
    Ok(sum)
}

/// Number of the order's crates that are on a pallet
pub async fn mapped_crate_count<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM crates c JOIN pallet_crate_mapping m ON m.crate_id = c.id WHERE c.order_id = ?",
    )
    .bind(id)
    .fetch_one(exec)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::customer::{self, CustomerInsert};

    async fn seed(pool: &SqlitePool) -> Order {
        let c = customer::insert(
            pool,
            CustomerInsert {
                name: "Matti",
                phone: "+358409999999",
                email: None,
                address: None,
            },
            10,
        )
        .await
        .unwrap();
        insert(
            pool,
            OrderInsert {
                customer_id: c.id,
                total_pouches: 9,
                weight_kg: None,
                comment: Some("two crates"),
            },
            10,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_defaults_to_pending() {
        let db = DbService::in_memory().await.unwrap();
        let order = seed(&db.pool).await;
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_pouches, 9);
        assert_eq!(order.comment.as_deref(), Some("two crates"));
        assert!(order.ready_at.is_none());
    }

    #[tokio::test]
    async fn test_transition_is_conditional() {
        let db = DbService::in_memory().await.unwrap();
        let order = seed(&db.pool).await;

        assert!(
            transition(&db.pool, order.id, OrderStatus::Pending, OrderStatus::Processing, 20)
                .await
                .unwrap()
        );
        assert!(
            !transition(&db.pool, order.id, OrderStatus::Pending, OrderStatus::Processing, 30)
                .await
                .unwrap()
        );
        assert!(!mark_picked_up(&db.pool, order.id, 40).await.unwrap());
        assert!(mark_loading(&db.pool, order.id, None, 50).await.unwrap());

        let order = find_by_id(&db.pool, order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Loading);
        // Comment kept when none is given
        assert_eq!(order.comment.as_deref(), Some("two crates"));
    }

    #[tokio::test]
    async fn test_ready_requires_crates() {
        let db = DbService::in_memory().await.unwrap();
        let order = seed(&db.pool).await;
        // No crates at all: never ready
        assert!(!mark_ready_if_complete(&db.pool, order.id, 20).await.unwrap());
    }

    #[tokio::test]
    async fn test_bin_and_restore_keep_previous_status() {
        let db = DbService::in_memory().await.unwrap();
        let order = seed(&db.pool).await;
        transition(&db.pool, order.id, OrderStatus::Pending, OrderStatus::Processing, 20)
            .await
            .unwrap();

        assert_eq!(bin_for_customer(&db.pool, order.customer_id, 30).await.unwrap(), 1);
        let binned = find_by_id(&db.pool, order.id).await.unwrap().unwrap();
        assert_eq!(binned.status, OrderStatus::Deleted);
        assert_eq!(binned.status_before_delete, Some(OrderStatus::Processing));

        let listed = list(&db.pool, None).await.unwrap();
        assert!(listed.is_empty());
        let listed = list(&db.pool, Some(OrderStatus::Deleted)).await.unwrap();
        assert_eq!(listed.len(), 1);

        assert_eq!(restore_for_customer(&db.pool, order.customer_id, 40).await.unwrap(), vec![order.id]);
        let restored = find_by_id(&db.pool, order.id).await.unwrap().unwrap();
        assert_eq!(restored.status, OrderStatus::Processing);
        assert!(restored.status_before_delete.is_none());
    }

    #[tokio::test]
    async fn test_list_joins_customer() {
        let db = DbService::in_memory().await.unwrap();
        let order = seed(&db.pool).await;
        let listed = list(&db.pool, Some(OrderStatus::Pending)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, order.id);
        assert_eq!(listed[0].customer_name, "Matti");
        assert_eq!(listed[0].crate_count, 0);
        assert!(list(&db.pool, Some(OrderStatus::Loading)).await.unwrap().is_empty());
    }
}
