//! Server events pushed to connected clients
//!
//! Events are published after the owning transaction commits. The wire form is
//! `{"event": "<name>", "data": {...}}`, with `data` absent for unit events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::OrderStatus;

/// Named event broadcast by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Intake committed a new order and its crates
    #[serde(rename = "orderCreated")]
    OrderCreated { order_id: i64 },
    /// Order moved pending → processing
    #[serde(rename = "orderProcessing")]
    OrderProcessing { order_id: i64 },
    /// Order moved to loading or picked-up
    #[serde(rename = "order-status-updated")]
    OrderStatusUpdated { order_id: i64, status: OrderStatus },
    /// Every crate of the order is on a pallet
    #[serde(rename = "orderReady")]
    OrderReady { order_id: i64 },
    /// Pallet reached its crate capacity (QR code)
    #[serde(rename = "palletFull")]
    PalletFull { pallet_id: String },
    /// Shelf reached its pallet capacity (QR code)
    #[serde(rename = "shelfFull")]
    ShelfFull { shelf_id: String },
    /// Customer list changed (bin, restore, purge)
    #[serde(rename = "customersUpdated")]
    CustomersUpdated,
}

impl ServerEvent {
    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::OrderCreated { .. } => "orderCreated",
            ServerEvent::OrderProcessing { .. } => "orderProcessing",
            ServerEvent::OrderStatusUpdated { .. } => "order-status-updated",
            ServerEvent::OrderReady { .. } => "orderReady",
            ServerEvent::PalletFull { .. } => "palletFull",
            ServerEvent::ShelfFull { .. } => "shelfFull",
            ServerEvent::CustomersUpdated => "customersUpdated",
        }
    }

    /// Order the event refers to, if any
    pub fn order_id(&self) -> Option<i64> {
        match self {
            ServerEvent::OrderCreated { order_id }
            | ServerEvent::OrderProcessing { order_id }
            | ServerEvent::OrderStatusUpdated { order_id, .. }
            | ServerEvent::OrderReady { order_id } => Some(*order_id),
            _ => None,
        }
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
