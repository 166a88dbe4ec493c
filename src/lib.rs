pub mod clock;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod forward;
pub mod id;
pub mod models;
pub mod path;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::forward::Forwarder;
use crate::service::EndpointService;
use crate::state::{AppState, SharedState};
use crate::store::EndpointStore;

/// Wire the store into the service and mount every route.
pub fn build_app(
    store: Arc<dyn EndpointStore>,
    config: Config,
) -> Result<(Router, SharedState), reqwest::Error> {
    let forwarder = Forwarder::new(config.forward_timeout)?;
    let endpoints = EndpointService::new(store, Arc::new(SystemClock), forwarder);

    let state: SharedState = Arc::new(AppState { config, endpoints });

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::forward_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.config.max_body_size))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state.clone());

    Ok((app, state))
}

async fn health() -> &'static str {
    "ok"
}
