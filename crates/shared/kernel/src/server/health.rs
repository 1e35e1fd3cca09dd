use super::state::ApiState;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use dtab_derive::{api_handler, api_model};
use dtab_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;

#[api_model]
/// Health check response
pub(super) struct HealthResponse {
    /// Status
    status: String,
    /// Version
    version: String,
    /// Uptime in seconds
    uptime: u64,
    /// Registered feature slices
    slices: usize,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: START_TIME.elapsed().as_secs(),
        slices: state.slice_count(),
    };

    ([(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate")], Json(body))
}
