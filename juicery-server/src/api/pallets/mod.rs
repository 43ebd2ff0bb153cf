//! Pallet API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/pallets", get(handler::list).post(handler::create))
        .route("/api/pallets/{id}/crates", get(handler::crates))
        .route("/api/assign-pallet", post(handler::assign))
}
