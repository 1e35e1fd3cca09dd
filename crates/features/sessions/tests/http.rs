#![cfg(feature = "server")]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dtab_kernel::domain::config::{ApiConfig, SessionBackend};
use dtab_kernel::server::ApiState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let mut config = ApiConfig::default();
    config.sessions.backend = SessionBackend::Memory;
    let slice = dtab_sessions::init(&config.sessions).unwrap();
    let state = ApiState::builder().config(config).register_slice(slice).build().unwrap();

    let (router, _) = dtab_sessions::server::router().with_state(state).split_for_parts();
    router
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn update(body: &Value, session: &str) -> Request<Body> {
    Request::post("/api/update-session")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-session-id", session)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn last_session_is_empty_before_any_save() {
    let response = app().oneshot(Request::get("/api/last-session").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"items": [], "selected": [], "timestamp": null}));
}

#[tokio::test]
async fn update_then_read_back() {
    let app = app();
    let body = json!({"items": ["iron_ingot", "gold_ingot"], "selected": ["gold_ingot"]});

    let response = app.clone().oneshot(update(&body, "tab1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let request = Request::get("/api/last-session").header("x-session-id", "tab1").body(Body::empty()).unwrap();
    let session = body_json(app.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(session["items"], json!(["iron_ingot", "gold_ingot"]));
    assert_eq!(session["selected"], json!(["gold_ingot"]));
    assert!(session["timestamp"].is_string());

    let other = app.oneshot(Request::get("/api/last-session").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(body_json(other).await["items"], json!([]));
}

#[tokio::test]
async fn invalid_identifiers_are_rejected() {
    let response = app().oneshot(update(&json!({"items": ["bad item"]}), "tab1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["category"], "validation_error");
}

#[tokio::test]
async fn mistyped_body_is_a_json_validation_error() {
    let response = app().oneshot(update(&json!({"items": "stick"}), "tab1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_json(response).await["error"]["category"], "validation_error");
}
