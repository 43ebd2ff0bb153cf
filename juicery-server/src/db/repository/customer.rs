//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::Customer;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, name, phone, email, address, created_at, deleted_at";

/// Customers not in the bin, newest first
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM customers WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC"
    );
    let customers = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(customers)
}

/// Customers in the bin, most recently binned first
pub async fn find_binned(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM customers WHERE deleted_at IS NOT NULL ORDER BY deleted_at DESC, id DESC"
    );
    let customers = sqlx::query_as::<_, Customer>(&sql).fetch_all(pool).await?;
    Ok(customers)
}

pub async fn find_by_id<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customers WHERE id = ?");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(customer)
}

pub struct CustomerInsert<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
}

pub async fn insert<'e>(
    exec: impl SqliteExecutor<'e>,
    data: CustomerInsert<'_>,
    now: i64,
) -> RepoResult<Customer> {
    let sql = format!(
        "INSERT INTO customers (name, phone, email, address, created_at) VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(data.name)
        .bind(data.phone)
        .bind(data.email)
        .bind(data.address)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(customer)
}

/// Set `deleted_at` if the customer is active; returns whether a row changed
pub async fn mark_binned<'e>(exec: impl SqliteExecutor<'e>, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE customers SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
        .bind(now)
        .bind(id)
        .execute(exec)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Clear `deleted_at` if the customer is in the bin; returns whether a row changed
pub async fn mark_restored<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows =
        sqlx::query("UPDATE customers SET deleted_at = NULL WHERE id = ? AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(exec)
            .await?;
    Ok(rows.rows_affected() == 1)
}

/// Hard delete a binned customer; orders, crates and mappings cascade
pub async fn purge<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customers WHERE id = ? AND deleted_at IS NOT NULL")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Fetch a customer or fail with `NotFound`
pub async fn get<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Customer> {
    find_by_id(exec, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}
