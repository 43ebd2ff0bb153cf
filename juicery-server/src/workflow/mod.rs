//! Order, crate, pallet and shelf workflow
//!
//! Every multi-row operation runs in one transaction whose first statement is
//! a write, so SQLite hands out the write lock before anything is read.
//! Events are published only after the commit succeeds.

pub mod bin;
pub mod intake;
pub mod packing;
pub mod pallet;
pub mod shelf;
pub mod status;

pub use intake::{IntakeRules, register_order};
pub use pallet::assign_crates_to_pallet;
pub use shelf::assign_pallets_to_shelf;
pub use status::{ProcessingOutcome, confirm_pickup, mark_done, start_processing};
