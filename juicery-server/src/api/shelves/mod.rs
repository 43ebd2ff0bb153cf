//! Shelf API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/shelves", get(handler::list).post(handler::create))
        .route("/api/shelves/{id}/pallets", get(handler::pallets))
        .route("/api/assign-shelf", post(handler::assign))
}
