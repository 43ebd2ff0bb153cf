//! Real-time event fan-out
//!
//! - [`EventBus`] - typed publish/subscribe over a broadcast channel
//! - [`ws`] - WebSocket transport forwarding every event as JSON

pub mod bus;
pub mod ws;

pub use bus::EventBus;
