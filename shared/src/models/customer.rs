//! Customer Model (intake)

use serde::{Deserialize, Serialize};

use super::inventory::Crate;
use super::order::Order;

/// Customer entity
///
/// `deleted_at` is set while the customer sits in the bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: i64,
    pub deleted_at: Option<i64>,
}

/// Intake payload: a customer delivering apples, and how many pouches the
/// delivery yields
///
/// Either `total_pouches` or `weight_kg` must be present. When only the weight
/// is given, the pouch count is derived from the configured yield.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub total_pouches: Option<i64>,
    pub weight_kg: Option<f64>,
    pub comment: Option<String>,
}

/// Everything written by one intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeResult {
    pub customer: Customer,
    pub order: Order,
    pub crates: Vec<Crate>,
}

/// Customer with their order history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub orders: Vec<Order>,
}
