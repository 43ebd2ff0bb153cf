//! Inventory Model: crates, pallets, shelves and the mappings between them

use serde::{Deserialize, Serialize};

use super::order::OrderStatus;

/// Fill state shared by pallets and shelves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum LocationStatus {
    Open,
    Full,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Open => "open",
            LocationStatus::Full => "full",
        }
    }

    /// A location is full once it holds exactly its capacity
    pub fn for_holding(holding: i64, capacity: i64) -> Self {
        if holding >= capacity {
            LocationStatus::Full
        } else {
            LocationStatus::Open
        }
    }
}

// =============================================================================
// Crate
// =============================================================================

/// Physical crate of pouches, labelled with a `CRATE_` QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Crate {
    pub id: i64,
    pub order_id: i64,
    pub pouch_count: i64,
    pub qr_code: String,
    pub created_at: i64,
}

/// Crate with the QR code of the pallet it sits on, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CrateWithPallet {
    pub id: i64,
    pub order_id: i64,
    pub pouch_count: i64,
    pub qr_code: String,
    pub created_at: i64,
    pub pallet_qr: Option<String>,
}

/// Scanner lookup result for a crate QR code
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CrateLookup {
    pub id: i64,
    pub qr_code: String,
    pub pouch_count: i64,
    pub order_id: i64,
    pub order_status: OrderStatus,
    pub customer_id: i64,
    pub customer_name: String,
    pub pallet_qr: Option<String>,
    pub shelf_qr: Option<String>,
}

// =============================================================================
// Pallet
// =============================================================================

/// Pallet with its derived crate count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Pallet {
    pub id: i64,
    pub qr_code: String,
    pub status: LocationStatus,
    /// Maximum number of crates
    pub capacity: i64,
    /// Number of crates currently mapped
    pub holding: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create pallet payload; capacity falls back to the configured default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PalletCreate {
    pub capacity: Option<i64>,
}

/// Scan batch: one pallet QR and the crate QRs loaded onto it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignPalletRequest {
    #[serde(default)]
    pub pallet_id: String,
    #[serde(default)]
    pub crate_ids: Vec<String>,
}

/// Outcome of a committed pallet assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignPalletResult {
    pub pallet_id: String,
    /// Crate QRs newly mapped by this batch
    pub mapped: Vec<String>,
    /// Crate QRs that were already on this pallet
    pub already_mapped: Vec<String>,
    /// Crate QRs that matched no crate
    pub unresolved: Vec<String>,
    /// Orders that became ready for pickup
    pub ready_orders: Vec<i64>,
    pub pallet_status: LocationStatus,
}

// =============================================================================
// Shelf
// =============================================================================

/// Shelf with its derived pallet count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shelf {
    pub id: i64,
    pub qr_code: String,
    pub status: LocationStatus,
    /// Maximum number of pallets
    pub capacity: i64,
    /// Number of pallets currently mapped
    pub holding: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create shelf payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfCreate {
    pub capacity: Option<i64>,
}

/// Scan batch: one shelf QR and the pallet QRs placed on it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignShelfRequest {
    #[serde(default)]
    pub shelf_id: String,
    #[serde(default)]
    pub pallet_ids: Vec<String>,
}

/// Outcome of a committed shelf assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignShelfResult {
    pub shelf_id: String,
    pub mapped: Vec<String>,
    pub already_mapped: Vec<String>,
    pub unresolved: Vec<String>,
    pub shelf_status: LocationStatus,
}
