#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use dtab_kernel::domain::config::{ApiConfig, MissingAssetPolicy, SessionBackend};
use dtab_kernel::server::ApiState;
use dtab_recipes::{DEFAULT_TEMPLATE, Recipes, RecipesInner, TemplateCache};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::io::{Cursor, Read};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "dtab-test-boundary";

struct TestApp {
    router: Router,
    _dir: TempDir,
}

fn app_with(configure: impl FnOnce(&mut ApiConfig), templates: Option<TemplateCache>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let mut config = ApiConfig::default();
    config.sessions.backend = SessionBackend::Memory;
    config.generator.output_dir = dir.path().join("output");
    config.generator.template_path = dir.path().join("recipe.json.j2");
    config.assets.dir = dir.path().join("assets");
    configure(&mut config);

    let templates = templates.unwrap_or_else(|| TemplateCache::from_source(DEFAULT_TEMPLATE).unwrap());
    let state = ApiState::builder()
        .register_slice(dtab_sessions::init(&config.sessions).unwrap())
        .register_slice(dtab_catalog::init().unwrap())
        .register_slice(Recipes::new(RecipesInner { templates }).into())
        .register_slice(dtab_packaging::init(&config).unwrap())
        .config(config)
        .build()
        .unwrap();

    let (router, _) = dtab_packaging::server::router()
        .merge(dtab_catalog::server::router())
        .merge(dtab_sessions::server::router())
        .with_state(state)
        .split_for_parts();
    TestApp { router, _dir: dir }
}

fn app() -> TestApp {
    app_with(|_| {}, None)
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, header::HeaderMap, Bytes) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    (status, headers, response.into_body().collect().await.unwrap().to_bytes())
}

fn generate(body: &Value) -> Request<Body> {
    Request::post("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload(name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"catalog_file\"; filename=\"{name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    );
    Request::post("/api/catalog/upload")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn json_body(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn documents(zip: &Bytes) -> Vec<(String, Value)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(zip.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut text = String::new();
            file.read_to_string(&mut text).unwrap();
            (file.name().to_owned(), serde_json::from_str(&text).unwrap())
        })
        .collect()
}

#[tokio::test]
async fn upload_select_generate_round_trip() {
    let app = app();

    let (status, _, body) = send(&app, upload("c.json", r#"["iron_ingot","gold_ingot","iron_ingot"]"#)).await;
    assert_eq!(status, StatusCode::OK);
    let items = json_body(&body)["items"].clone();
    assert_eq!(items, json!(["iron_ingot", "gold_ingot"]));

    let (status, headers, zip) = send(&app, generate(&json!({"items": items, "mode": "recipes-only"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"minecraft_recipes_recipes-only.zip\""
    );

    let docs = documents(&zip);
    assert_eq!(docs.len(), 2);
    let results: Vec<_> = docs.iter().map(|(_, doc)| doc["minecraft:recipe_shaped"]["result"].clone()).collect();
    assert!(results.contains(&json!({"item": "minecraft:iron_ingot", "count": 2})));
    assert!(results.contains(&json!({"item": "minecraft:gold_ingot", "count": 2})));

    let (_, _, session) = send(&app, Request::get("/api/last-session").body(Body::empty()).unwrap()).await;
    assert_eq!(json_body(&session)["selected"], json!(["iron_ingot", "gold_ingot"]));

    let (status, headers, latest) = send(&app, Request::get("/download").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_DISPOSITION], "attachment; filename=\"minecraft_recipes.zip\"");
    assert_eq!(latest, zip);
}

#[tokio::test]
async fn duplicates_and_non_stackables_are_dropped() {
    let app = app();
    let (status, _, zip) =
        send(&app, generate(&json!({"items": ["stick", "minecraft:stick", "diamond_sword"]}))).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = documents(&zip).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["stick_19.json"]);
}

#[tokio::test]
async fn complete_pack_contains_both_trees() {
    let app = app();
    let (status, headers, zip) = send(&app, generate(&json!({"items": ["stick"], "mode": "complete_pack"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"minecraft_recipes_complete-pack.zip\""
    );

    let archive = zip::ZipArchive::new(Cursor::new(zip.to_vec())).unwrap();
    let names: Vec<_> = archive.file_names().collect();
    assert!(names.contains(&"Duplicating Table BP/recipes/stick_19.json"));
    assert!(names.contains(&"Duplicating Table RP/textures/blocks/duplicating_table_top.png"));
}

#[tokio::test]
async fn request_errors_use_their_categories() {
    let app = app();

    let cases = [
        (json!({"items": []}), StatusCode::UNPROCESSABLE_ENTITY, "packaging_error"),
        (json!({"items": ["elytra"]}), StatusCode::BAD_REQUEST, "validation_error"),
        (json!({"items": ["bad item"]}), StatusCode::BAD_REQUEST, "validation_error"),
        (json!({"items": ["stick"], "mode": "zip"}), StatusCode::BAD_REQUEST, "validation_error"),
    ];
    for (request, expected, category) in cases {
        let (status, _, body) = send(&app, generate(&request)).await;
        assert_eq!(status, expected, "{request}");
        assert_eq!(json_body(&body)["error"]["category"], category);
    }
}

#[tokio::test]
async fn selection_size_is_bounded() {
    let app = app_with(|config| config.generator.max_items = 2, None);
    let (status, _, _) = send(&app, generate(&json!({"items": ["stick", "coal", "flint"]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fail_policy_rejects_pack_modes() {
    let app = app_with(|config| config.assets.missing = MissingAssetPolicy::Fail, None);

    let (status, _, body) = send(&app, generate(&json!({"items": ["stick"], "mode": "behavior-pack"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(&body)["error"]["message"].as_str().unwrap().contains("pack_icon.png"));

    let (status, _, _) = send(&app, generate(&json!({"items": ["stick"]}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_template_is_unavailable_until_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe.json.j2");
    let templates = TemplateCache::load(&path).unwrap();
    let app = app_with(|config| config.generator.template_path = path.clone(), Some(templates));

    let (status, _, body) = send(&app, generate(&json!({"items": ["stick"]}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(&body)["error"]["category"], "template_missing");

    std::fs::write(&path, DEFAULT_TEMPLATE).unwrap();
    let (status, _, body) = send(&app, Request::post("/api/admin/reload").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["template_loaded"], true);

    let (status, _, _) = send(&app, generate(&json!({"items": ["stick"]}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn downloads_are_rate_limited_per_client() {
    let app = app_with(|config| config.limits.download_requests = 1, None);
    let from = |addr: &str| {
        Request::post("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", addr)
            .body(Body::from(json!({"items": ["stick"]}).to_string()))
            .unwrap()
    };

    let (status, _, _) = send(&app, from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, headers, body) = send(&app, from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(headers.contains_key(header::RETRY_AFTER));
    assert!(json_body(&body)["error"]["retry_after"].as_u64().unwrap() >= 1);

    let (status, _, _) = send(&app, from("10.0.0.2")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn download_before_generate_is_not_found() {
    let app = app();
    let (status, _, body) = send(&app, Request::get("/download").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["error"]["category"], "not_found");
}

#[tokio::test]
async fn mistyped_body_is_a_json_validation_error() {
    let app = app();
    for body in [r#"{"items":"stick"}"#, r#"{"items":["stick"]"#] {
        let request = Request::post("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let (status, headers, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(json_body(&body)["success"], false);
        assert_eq!(json_body(&body)["error"]["category"], "validation_error");
    }
}

#[tokio::test]
async fn downloads_are_scoped_to_the_session() {
    let app = app();
    let generate_as = |session: &str, items: Value| {
        Request::post("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-session-id", session)
            .body(Body::from(json!({"items": items}).to_string()))
            .unwrap()
    };
    let download_as =
        |session: &str| Request::get("/download").header("x-session-id", session).body(Body::empty()).unwrap();

    let (status, _, zip_a) = send(&app, generate_as("tab-a", json!(["stick"]))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, latest) = send(&app, download_as("tab-a")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest, zip_a);

    let (status, _, body) = send(&app, download_as("tab-b")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["error"]["category"], "not_found");

    let (status, _, zip_b) = send(&app, generate_as("tab-b", json!(["coal", "flint"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(documents(&zip_b).len(), 2);

    let (_, _, latest_a) = send(&app, download_as("tab-a")).await;
    let (_, _, latest_b) = send(&app, download_as("tab-b")).await;
    assert_eq!(latest_a, zip_a);
    assert_eq!(latest_b, zip_b);
}
