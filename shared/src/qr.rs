//! QR payload strings
//!
//! The backend only issues payloads; rendering the QR image is the client's job.

use std::fmt;
use uuid::Uuid;

/// What a QR label is stuck on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QrKind {
    Crate,
    Pallet,
    Shelf,
}

impl QrKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            QrKind::Crate => "CRATE_",
            QrKind::Pallet => "PALLET_",
            QrKind::Shelf => "SHELF_",
        }
    }

    /// Fresh `<PREFIX>_<uuid-v4>` payload
    pub fn generate(&self) -> String {
        format!("{}{}", self.prefix(), Uuid::new_v4())
    }

    /// Classify a scanned payload by its prefix
    pub fn of(payload: &str) -> Option<Self> {
        [QrKind::Crate, QrKind::Pallet, QrKind::Shelf]
            .into_iter()
            .find(|kind| payload.starts_with(kind.prefix()))
    }
}

impl fmt::Display for QrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrKind::Crate => write!(f, "crate"),
            QrKind::Pallet => write!(f, "pallet"),
            QrKind::Shelf => write!(f, "shelf"),
        }
    }
}
