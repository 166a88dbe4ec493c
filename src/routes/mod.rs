pub mod endpoints;
pub mod extract;
pub mod forward;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/v1/endpoints", get(endpoints::list))
        .route("/api/v1/endpoints/{id}", get(endpoints::get))
        .route("/api/v1/endpoints.path/{path}", get(endpoints::get_by_path))
        .route("/api/v1/endpoints.new", post(endpoints::create))
        .route("/api/v1/endpoints.update", put(endpoints::update))
        .route("/api/v1/endpoints.delete", delete(endpoints::delete))
}

pub fn forward_routes() -> Router<SharedState> {
    Router::new().route("/api/v1/endpoints.send/{path}", post(forward::send))
}
