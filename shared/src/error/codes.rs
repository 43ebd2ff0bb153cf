//! Unified error codes for the juicery backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Customer errors
//! - 2xxx: Order errors
//! - 3xxx: Inventory errors (crates, pallets, shelves)
//! - 4xxx: Device errors (label printer, SMS gateway)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code sent as the `code` field of every response
///
/// Serialized as a bare number so the scanner and dashboard clients can switch
/// on it without a string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Success envelope code, never carried by an [`AppError`](super::AppError)
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Numeric input above its allowed maximum
    ValueOutOfRange = 8,

    // ==================== 1xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 1001,
    /// Customer is already in the bin
    CustomerAlreadyDeleted = 1002,
    /// Customer is not in the bin
    CustomerNotInBin = 1003,

    // ==================== 2xxx: Order ====================
    /// Order not found
    OrderNotFound = 2001,
    /// Crates registered for the order do not add up to its pouch total
    OrderCratesIncomplete = 2002,
    /// Requested status change is not allowed from the current status
    OrderInvalidTransition = 2003,
    /// Order would contain no pouches
    OrderEmpty = 2004,

    // ==================== 3xxx: Inventory ====================
    /// Crate not found
    CrateNotFound = 3001,
    /// Crate is already mapped to another pallet
    CrateOnOtherPallet = 3002,
    /// Pallet not found
    PalletNotFound = 3101,
    /// Pallet cannot hold more crates
    PalletCapacityExceeded = 3102,
    /// Pallet is already placed on another shelf
    PalletOnOtherShelf = 3103,
    /// Shelf not found
    ShelfNotFound = 3201,
    /// Shelf cannot hold more pallets
    ShelfCapacityExceeded = 3202,

    // ==================== 4xxx: Device ====================
    /// Label printer is not reachable
    PrinterNotAvailable = 4001,
    /// Label printer rejected the job
    PrintFailed = 4002,
    /// SMS could not be delivered to the gateway
    SmsFailed = 4101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerAlreadyDeleted => "Customer is already in the bin",
            ErrorCode::CustomerNotInBin => "Customer is not in the bin",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderCratesIncomplete => "Crates incomplete",
            ErrorCode::OrderInvalidTransition => "Order status transition not allowed",
            ErrorCode::OrderEmpty => "Order has no pouches",

            // Inventory
            ErrorCode::CrateNotFound => "Crate not found",
            ErrorCode::CrateOnOtherPallet => "Crate is already on another pallet",
            ErrorCode::PalletNotFound => "Pallet QR not found",
            ErrorCode::PalletCapacityExceeded => "Pallet capacity exceeded",
            ErrorCode::PalletOnOtherShelf => "Pallet is already on another shelf",
            ErrorCode::ShelfNotFound => "Shelf QR not found",
            ErrorCode::ShelfCapacityExceeded => "Shelf capacity exceeded",

            // Device
            ErrorCode::PrinterNotAvailable => "Label printer is not available",
            ErrorCode::PrintFailed => "Print operation failed",
            ErrorCode::SmsFailed => "SMS delivery failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Customer
            1001 => Ok(ErrorCode::CustomerNotFound),
            1002 => Ok(ErrorCode::CustomerAlreadyDeleted),
            1003 => Ok(ErrorCode::CustomerNotInBin),

            // Order
            2001 => Ok(ErrorCode::OrderNotFound),
            2002 => Ok(ErrorCode::OrderCratesIncomplete),
            2003 => Ok(ErrorCode::OrderInvalidTransition),
            2004 => Ok(ErrorCode::OrderEmpty),

            // Inventory
            3001 => Ok(ErrorCode::CrateNotFound),
            3002 => Ok(ErrorCode::CrateOnOtherPallet),
            3101 => Ok(ErrorCode::PalletNotFound),
            3102 => Ok(ErrorCode::PalletCapacityExceeded),
            3103 => Ok(ErrorCode::PalletOnOtherShelf),
            3201 => Ok(ErrorCode::ShelfNotFound),
            3202 => Ok(ErrorCode::ShelfCapacityExceeded),

            // Device
            4001 => Ok(ErrorCode::PrinterNotAvailable),
            4002 => Ok(ErrorCode::PrintFailed),
            4101 => Ok(ErrorCode::SmsFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::ValueOutOfRange,
        ErrorCode::CustomerNotFound,
        ErrorCode::CustomerAlreadyDeleted,
        ErrorCode::CustomerNotInBin,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderCratesIncomplete,
        ErrorCode::OrderInvalidTransition,
        ErrorCode::OrderEmpty,
        ErrorCode::CrateNotFound,
        ErrorCode::CrateOnOtherPallet,
        ErrorCode::PalletNotFound,
        ErrorCode::PalletCapacityExceeded,
        ErrorCode::PalletOnOtherShelf,
        ErrorCode::ShelfNotFound,
        ErrorCode::ShelfCapacityExceeded,
        ErrorCode::PrinterNotAvailable,
        ErrorCode::PrintFailed,
        ErrorCode::SmsFailed,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 1001);
        assert_eq!(ErrorCode::OrderCratesIncomplete.code(), 2002);
        assert_eq!(ErrorCode::PalletNotFound.code(), 3101);
        assert_eq!(ErrorCode::PrinterNotAvailable.code(), 4001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_every_code_converts_back() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_invalid_codes_rejected() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(2999), Err(InvalidErrorCode(2999)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderCratesIncomplete).unwrap();
        assert_eq!(json, "2002");
        let code: ErrorCode = serde_json::from_str("3101").unwrap();
        assert_eq!(code, ErrorCode::PalletNotFound);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
