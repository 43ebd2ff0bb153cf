//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Customer errors
/// - 2xxx: Order errors
/// - 3xxx: Inventory errors
/// - 4xxx: Device errors
/// - 9xxx: System errors (anything outside the ranges above)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Customer errors (1xxx)
    Customer,
    /// Order errors (2xxx)
    Order,
    /// Inventory errors (3xxx)
    Inventory,
    /// Device errors (4xxx)
    Device,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Customer,
            2000..3000 => Self::Order,
            3000..4000 => Self::Inventory,
            4000..5000 => Self::Device,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
