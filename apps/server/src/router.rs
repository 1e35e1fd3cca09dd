use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, header};
use dtab::kernel::prelude::ApiState;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Duplicating Table", description = "Recipe and pack generator for the duplicating table"))]
struct ApiDoc;

/// Sent on every response, overriding handler values.
fn hardening_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (header::CACHE_CONTROL, HeaderValue::from_static("no-store, no-cache, must-revalidate")),
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
    ]
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let body_limit = state.config.limits.max_upload_bytes;

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(dtab::server::router::api_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    let app = Router::new().merge(openapi_routes).merge(scalar_routes).layer(TraceLayer::new_for_http());
    hardening_headers()
        .into_iter()
        .fold(app, |app, (name, value)| app.layer(SetResponseHeaderLayer::overriding(name, value)))
}
