//! Order API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/processing", post(handler::processing))
        .route("/{id}/done", post(handler::done))
        .route("/{id}/pickup", post(handler::pickup))
        .route("/{id}/notify", post(handler::notify))
        .route("/{id}/label", post(handler::label))
}
