#![allow(dead_code)]

use juicery_server::db::repository::pallet;
use juicery_server::workflow::IntakeRules;
use juicery_server::{DbService, EventBus};
use shared::models::{IntakeRequest, IntakeResult, Pallet};
use sqlx::SqlitePool;

pub async fn memory_db() -> DbService {
    DbService::in_memory().await.expect("in-memory database")
}

pub fn intake_request(name: &str, pouches: i64) -> IntakeRequest {
    IntakeRequest {
        name: name.to_string(),
        phone: "+358401234567".to_string(),
        email: None,
        address: None,
        total_pouches: Some(pouches),
        weight_kg: None,
        comment: None,
    }
}

/// Register an order; the intake event goes to a throwaway bus
pub async fn register(pool: &SqlitePool, name: &str, pouches: i64) -> IntakeResult {
    let rules = IntakeRules::default();
    juicery_server::workflow::register_order(pool, &EventBus::new(), rules, intake_request(name, pouches))
        .await
        .expect("intake")
}

pub async fn new_pallet(pool: &SqlitePool, qr: &str, capacity: i64) -> Pallet {
    pallet::create(pool, qr, capacity, shared::util::now_millis())
        .await
        .expect("pallet")
}

pub fn crate_qrs(result: &IntakeResult) -> Vec<String> {
    result.crates.iter().map(|c| c.qr_code.clone()).collect()
}

pub async fn mapping_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM pallet_crate_mapping")
        .fetch_one(pool)
        .await
        .expect("count")
}
