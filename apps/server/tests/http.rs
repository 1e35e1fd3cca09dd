use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dtab::domain::config::{ApiConfig, SessionBackend};
use dtab_server::Server;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

async fn server(configure: impl FnOnce(&mut ApiConfig)) -> (Server, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = ApiConfig::default();
    config.sessions.backend = SessionBackend::Memory;
    config.generator.template_path = dir.path().join("templates/recipe.json.j2");
    config.generator.output_dir = dir.path().join("output");
    config.assets.dir = dir.path().join("assets");
    configure(&mut config);

    (Server::builder().config(config).build().await.unwrap(), dir)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone().oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap()
}

#[tokio::test]
async fn health_reports_every_slice() {
    let (server, _dir) = server(|_| {}).await;
    let response = get(&server.router(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert!(response.headers()[header::CACHE_CONTROL].to_str().unwrap().contains("no-store"));

    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert_eq!(body["status"], "up");
    assert_eq!(body["slices"], 4);
}

#[tokio::test]
async fn default_template_is_written_at_startup() {
    let (server, dir) = server(|_| {}).await;
    assert!(dir.path().join("templates/recipe.json.j2").exists());

    let request = Request::post("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"items": ["iron_ingot"]}).to_string()))
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
}

#[tokio::test]
async fn missing_template_without_bootstrap_degrades() {
    let (server, dir) = server(|config| config.generator.create_default_template = false).await;
    assert!(!dir.path().join("templates/recipe.json.j2").exists());

    let request = Request::post("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"items": ["iron_ingot"]}).to_string()))
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn openapi_reference_is_served() {
    let (server, _dir) = server(|_| {}).await;
    let response = get(&server.router(), "/api").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_uploads_are_rejected() {
    let (server, _dir) = server(|config| config.limits.max_upload_bytes = 64).await;

    let request = Request::post("/api/catalog/upload")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
        .body(Body::from(format!(
            "--x\r\nContent-Disposition: form-data; name=\"catalog_file\"; filename=\"a.txt\"\r\n\r\n{}\r\n--x--\r\n",
            "stick\n".repeat(64)
        )))
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}
