//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness and database check
//! - [`customers`] - intake and customer records
//! - [`bin`] - logically deleted customers
//! - [`orders`] - order listing and status transitions
//! - [`crates`] - crate QR lookup
//! - [`pallets`] - pallets and crate-to-pallet assignment
//! - [`shelves`] - shelves and pallet-to-shelf assignment
//! - [`reports`] - dashboard aggregates
//! - [`printer`] - label printer status
//!
//! `GET /ws` streams server events, see [`crate::events::ws`].

pub mod health;

pub mod bin;
pub mod crates;
pub mod customers;
pub mod orders;
pub mod pallets;
pub mod printer;
pub mod reports;
pub mod shelves;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// All routes, state not yet attached
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(customers::router())
        .merge(bin::router())
        .merge(orders::router())
        .merge(crates::router())
        .merge(pallets::router())
        .merge(shelves::router())
        .merge(reports::router())
        .merge(printer::router())
        .route("/ws", get(crate::events::ws::handle_ws))
}

/// Router with state and HTTP middleware
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
