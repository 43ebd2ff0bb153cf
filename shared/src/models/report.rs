//! Dashboard report models

use serde::{Deserialize, Serialize};

/// Order and pouch totals for one status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusCount {
    pub status: String,
    pub orders: i64,
    pub pouches: i64,
}

/// Operational snapshot for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub orders_by_status: Vec<StatusCount>,
    pub pouches_pending: i64,
    pub pouches_in_flight: i64,
    pub pouches_ready: i64,
    pub crates_total: i64,
    pub crates_mapped: i64,
    pub pallets_open: i64,
    pub pallets_full: i64,
    pub shelves_open: i64,
    pub shelves_full: i64,
    pub customers_active: i64,
    pub customers_binned: i64,
}

/// Intake volume for one UTC day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyIntake {
    /// `YYYY-MM-DD`
    pub day: String,
    pub orders: i64,
    pub pouches: i64,
}

/// Query string for the daily report; both bounds are inclusive `YYYY-MM-DD`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
