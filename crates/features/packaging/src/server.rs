//! `POST /api/generate`, `GET /download` and `POST /api/admin/reload`.

use crate::{Packaging, archive, assemble};
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use dtab_catalog::ItemRegistry;
use dtab_catalog::stackable::partition_stackable;
use dtab_derive::{api_handler, api_model};
use dtab_kernel::domain::constants::{GENERATOR_TAG, SYSTEM_TAG};
use dtab_kernel::domain::pack::PackMode;
use dtab_kernel::item::ItemId;
use dtab_kernel::server::{ApiError, ApiJson, ApiResult, ApiState, ClientAddr, ErrorResponse};
use dtab_kernel::session_key::SessionKey;
use dtab_recipes::Recipes;
use dtab_sessions::server::parse_items;
use dtab_sessions::{Session, Sessions};
use std::time::Duration;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Download name of `GET /download`.
pub const LATEST_ARCHIVE_NAME: &str = "minecraft_recipes.zip";

#[api_model(rename_all = "snake_case")]
pub struct GenerateRequest {
    pub items: Vec<String>,
    /// `recipes-only` (default), `categorized`, `datapack`, `behavior-pack` or `complete-pack`.
    #[serde(default)]
    pub mode: Option<String>,
}

#[api_model(rename_all = "snake_case")]
pub struct ReloadResponse {
    pub success: bool,
    pub template_loaded: bool,
    /// Asset files replaced by placeholders (or refused, under the `fail` policy).
    pub missing_assets: Vec<String>,
    pub message: String,
}

fn rate_limit(state: &ApiState, client: &ClientAddr) -> ApiResult<()> {
    state.downloads.check(client.as_str()).map_err(|wait| ApiError::RateLimited {
        retry_after: retry_after_secs(wait),
        context: Some(client.to_string().into()),
    })
}

/// Whole seconds, rounded up, never zero.
fn retry_after_secs(wait: Duration) -> u64 {
    (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
}

fn parse_mode(raw: Option<&str>) -> ApiResult<PackMode> {
    raw.map_or(Ok(PackMode::default()), |raw| {
        PackMode::parse(raw).ok_or_else(|| ApiError::validation(format!("unknown mode '{raw}'")))
    })
}

fn zip_response(bytes: Vec<u8>, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        bytes,
    )
        .into_response()
}

/// Adds the generated items to the session registry and makes them the selection.
async fn remember_selection(state: &ApiState, key: &SessionKey, selected: &[ItemId]) -> ApiResult<()> {
    let sessions = state.try_get_slice::<Sessions>()?;
    let session = sessions.store.load(key).await?;

    let mut registry: ItemRegistry = session.items.into_iter().collect();
    registry.add(selected.iter().cloned());
    sessions.store.put(key, &Session::new(registry.into_vec(), selected.to_vec())).await?;
    Ok(())
}

#[api_handler(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    params(("x-session-id" = Option<String>, Header, description = "Session key")),
    responses(
        (status = OK, description = "Zip archive in the requested layout", content_type = "application/zip", body = Vec<u8>),
        (status = BAD_REQUEST, description = "Invalid identifier, mode or selection size", body = ErrorResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Nothing selected or a pack asset is missing", body = ErrorResponse),
        (status = TOO_MANY_REQUESTS, description = "Download rate limit exceeded", body = ErrorResponse),
        (status = SERVICE_UNAVAILABLE, description = "Recipe template not loaded", body = ErrorResponse),
    ),
    tag = GENERATOR_TAG,
)]
pub(crate) async fn generate(
    State(state): State<ApiState>,
    key: SessionKey,
    client: ClientAddr,
    ApiJson(request): ApiJson<GenerateRequest>,
) -> ApiResult<Response> {
    rate_limit(&state, &client)?;

    let mode = parse_mode(request.mode.as_deref())?;
    let packaging = state.try_get_slice::<Packaging>()?;
    let recipes = state.try_get_slice::<Recipes>()?;

    let mut unique = ItemRegistry::new();
    unique.add(parse_items(&request.items)?);
    if unique.len() > packaging.max_items {
        return Err(ApiError::validation(format!(
            "{} items selected, at most {} are allowed",
            unique.len(),
            packaging.max_items
        )));
    }

    let (stackable, filtered) = partition_stackable(unique.into_vec());
    if stackable.is_empty() && !filtered.is_empty() {
        return Err(ApiError::validation("every selected item is non-stackable"));
    }

    let rendered = recipes.templates.render_all(&stackable)?;
    let package = {
        let assets = packaging.assets.read();
        assemble(&rendered, mode, &assets)?
    };
    let bytes = package.to_zip()?;

    if let Err(err) = remember_selection(&state, &key, &stackable).await {
        tracing::warn!(session = %key, error = %err, "Failed to save selection");
    }
    if let Err(err) = archive::write_latest(&packaging.output_dir, &key, &bytes).await {
        tracing::warn!(session = %key, error = %err, "Failed to keep latest archive");
    }

    tracing::info!(
        session = %key,
        %mode,
        items = package.recipe_count,
        filtered = filtered.len(),
        bytes = bytes.len(),
        "Archive generated"
    );
    Ok(zip_response(bytes, &mode.archive_name()))
}

#[api_handler(
    get,
    path = "/download",
    params(("x-session-id" = Option<String>, Header, description = "Session key")),
    responses(
        (status = OK, description = "Most recent archive of the session", content_type = "application/zip", body = Vec<u8>),
        (status = NOT_FOUND, description = "Nothing generated yet", body = ErrorResponse),
        (status = TOO_MANY_REQUESTS, description = "Download rate limit exceeded", body = ErrorResponse),
    ),
    tag = GENERATOR_TAG,
)]
pub(crate) async fn download_latest(
    State(state): State<ApiState>,
    key: SessionKey,
    client: ClientAddr,
) -> ApiResult<Response> {
    rate_limit(&state, &client)?;

    let packaging = state.try_get_slice::<Packaging>()?;
    let Some(bytes) = archive::read_latest(&packaging.output_dir, &key).await? else {
        return Err(ApiError::not_found("no archive has been generated yet"));
    };
    Ok(zip_response(bytes, LATEST_ARCHIVE_NAME))
}

#[api_handler(
    post,
    path = "/api/admin/reload",
    responses(
        (status = OK, description = "Template and assets re-read", body = ReloadResponse),
        (status = SERVICE_UNAVAILABLE, description = "Template file is absent or invalid", body = ErrorResponse),
    ),
    tag = SYSTEM_TAG,
)]
pub(crate) async fn reload(State(state): State<ApiState>) -> ApiResult<Json<ReloadResponse>> {
    let packaging = state.try_get_slice::<Packaging>()?;
    let recipes = state.try_get_slice::<Recipes>()?;

    let missing = packaging.reload_assets()?;
    recipes.templates.reload()?;

    let missing_assets: Vec<String> = missing.iter().map(|kind| kind.file_name().to_owned()).collect();
    tracing::info!(missing = missing_assets.len(), "Template and assets reloaded");

    Ok(Json(ReloadResponse {
        success: true,
        template_loaded: recipes.templates.is_loaded(),
        missing_assets,
        message: "Template and assets reloaded".to_owned(),
    }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(generate))
        .routes(routes!(download_latest))
        .routes(routes!(reload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(58)), 58);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[test]
    fn modes_accept_aliases() {
        assert_eq!(parse_mode(None).unwrap(), PackMode::RecipesOnly);
        assert_eq!(parse_mode(Some("custom")).unwrap(), PackMode::Categorized);
        assert!(matches!(parse_mode(Some("zip")), Err(ApiError::Validation { .. })));
    }
}
