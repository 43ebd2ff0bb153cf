//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::customer::Customer;
use super::inventory::CrateWithPallet;

/// Order lifecycle status
///
/// `pending → processing → loading → ready-for-pickup → picked-up`, plus the
/// `deleted` bin state entered when the owning customer is moved to the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum OrderStatus {
    Pending,
    Processing,
    Loading,
    ReadyForPickup,
    PickedUp,
    Deleted,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Loading,
        OrderStatus::ReadyForPickup,
        OrderStatus::PickedUp,
        OrderStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Loading => "loading",
            OrderStatus::ReadyForPickup => "ready-for-pickup",
            OrderStatus::PickedUp => "picked-up",
            OrderStatus::Deleted => "deleted",
        }
    }

    /// Statuses from which a completed pallet mapping flips the order to ready
    pub fn can_become_ready(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Loading
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status: {s}"))
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Expected number of pouches across all crates
    pub total_pouches: i64,
    /// Apple weight delivered at intake, when recorded
    pub weight_kg: Option<f64>,
    pub status: OrderStatus,
    /// Status to return to when the customer is restored from the bin
    pub status_before_delete: Option<OrderStatus>,
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub ready_at: Option<i64>,
    pub picked_up_at: Option<i64>,
}

/// Order row for list views, joined with its customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_pouches: i64,
    pub status: OrderStatus,
    pub comment: Option<String>,
    pub created_at: i64,
    pub crate_count: i64,
    pub mapped_crates: i64,
}

/// Full order view: customer, crates and their pallet placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub customer: Customer,
    pub crates: Vec<CrateWithPallet>,
    pub mapped_crates: i64,
}

/// Query string for `GET /api/orders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

/// Body for the processing → loading transition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDoneRequest {
    pub comment: Option<String>,
}
