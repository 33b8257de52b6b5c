use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

pub mod consts;
pub mod routes;
pub mod state;

use state::Services;

pub fn create_app(services: Services, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(routes::health::create_route())
        .merge(routes::upload::create_route(services))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
