use axum::{routing::get, Json, Router};
use common::dtos::HealthDto;

use crate::consts::{NAME, VERSION};

pub fn create_route() -> Router {
    Router::new().route("/health", get(health))
}

#[tracing::instrument]
pub async fn health() -> Json<HealthDto<'static>> {
    Json(HealthDto {
        name: NAME,
        version: VERSION,
    })
}
