//! Domain models
//!
//! Row types derive `sqlx::FromRow` when the `db` feature is enabled.

pub mod customer;
pub mod inventory;
pub mod order;
pub mod report;

pub use customer::*;
pub use inventory::*;
pub use order::*;
pub use report::*;
