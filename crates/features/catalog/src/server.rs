//! Upload, search and registry editing endpoints. The registry lives in the caller's session.

use crate::registry::ItemRegistry;
use crate::upload::{UploadBatch, UploadReport};
use crate::Catalog;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use dtab_derive::{api_handler, api_model};
use dtab_kernel::domain::constants::CATALOG_TAG;
use dtab_kernel::item::ItemId;
use dtab_kernel::server::{ApiError, ApiQuery, ApiResult, ApiState, ErrorResponse};
use dtab_kernel::session_key::SessionKey;
use dtab_sessions::{Session, Sessions};
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Multipart part name carrying catalog files.
pub const UPLOAD_FIELD: &str = "catalog_file";

#[derive(Debug, utoipa::ToSchema)]
#[allow(dead_code)]
pub(crate) struct UploadForm {
    /// One or more `.json` or `.txt` catalogs.
    #[schema(value_type = Vec<String>, format = Binary)]
    catalog_file: Vec<Vec<u8>>,
}

#[api_model(rename_all = "snake_case")]
pub struct UploadResponse {
    pub success: bool,
    /// Unique stackable items found in the upload.
    pub items: Vec<String>,
    pub count: usize,
    /// Items that were new to the session registry.
    pub added: usize,
    pub total_items: usize,
    pub unique_items: usize,
    pub filtered_items: usize,
    pub processed_files: Vec<String>,
    pub failed_files: Vec<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl UploadResponse {
    fn new(report: UploadReport, added: usize) -> Self {
        let message = report.message();
        let warning = report.warning();
        let items: Vec<String> = report.stackable.into_iter().map(ItemId::into_inner).collect();

        Self {
            success: true,
            count: items.len(),
            items,
            added,
            total_items: report.total_items,
            unique_items: report.unique_items,
            filtered_items: report.filtered.len(),
            processed_files: report.processed_files,
            failed_files: report.failed_files,
            message,
            warning,
        }
    }
}

#[api_model(rename_all = "snake_case")]
/// Registry contents, or the subset matching a search.
pub struct RegistryResponse {
    pub items: Vec<String>,
    pub count: usize,
}

impl<'a> FromIterator<&'a ItemId> for RegistryResponse {
    fn from_iter<I: IntoIterator<Item = &'a ItemId>>(iter: I) -> Self {
        let items: Vec<String> = iter.into_iter().map(ToString::to_string).collect();
        Self { count: items.len(), items }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring; empty matches everything.
    #[serde(default)]
    pub q: String,
}

async fn load_registry(
    state: &ApiState,
    key: &SessionKey,
) -> ApiResult<(Session, ItemRegistry)> {
    let sessions = state.try_get_slice::<Sessions>()?;
    let session = sessions.store.load(key).await?;
    let registry = session.items.iter().cloned().collect();
    Ok((session, registry))
}

/// Saves `registry`, dropping selections that are no longer in it.
async fn save_registry(
    state: &ApiState,
    key: &SessionKey,
    registry: &ItemRegistry,
    selected: Vec<ItemId>,
) -> ApiResult<()> {
    let sessions = state.try_get_slice::<Sessions>()?;
    let selected = selected.into_iter().filter(|item| registry.contains(item.as_str())).collect();
    let items = registry.iter().cloned().collect();
    sessions.store.put(key, &Session::new(items, selected)).await?;
    Ok(())
}

#[api_handler(
    post,
    path = "/api/catalog/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = OK, description = "Items extracted and merged into the session", body = UploadResponse),
        (status = BAD_REQUEST, description = "No file produced any item", body = ErrorResponse),
    ),
    tag = CATALOG_TAG,
)]
pub(crate) async fn upload_catalog(
    State(state): State<ApiState>,
    key: SessionKey,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let catalog = state.try_get_slice::<Catalog>()?;
    let mut batch = UploadBatch::new();

    while let Some(field) =
        multipart.next_field().await.map_err(|e| ApiError::parse(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_owned)
        else {
            continue;
        };

        match field.bytes().await {
            Ok(bytes) => batch.add_file(&catalog.parser, &file_name, &bytes),
            Err(e) => batch.add_failure(&file_name, &e.body_text()),
        }
    }

    if batch.is_empty() {
        return Err(ApiError::parse("No files uploaded"));
    }
    let report = batch.finish()?;

    let (session, mut registry) = load_registry(&state, &key).await?;
    let added = registry.add(report.stackable.iter().cloned());
    save_registry(&state, &key, &registry, session.selected).await?;

    tracing::info!(
        session = %key,
        items = report.stackable.len(),
        added,
        filtered = report.filtered.len(),
        "Catalog upload merged"
    );
    Ok(Json(UploadResponse::new(report, added)))
}

#[api_handler(
    get,
    path = "/api/catalog/search",
    params(SearchQuery),
    responses((status = OK, description = "Matching identifiers in registry order", body = RegistryResponse)),
    tag = CATALOG_TAG,
)]
pub(crate) async fn search_items(
    State(state): State<ApiState>,
    key: SessionKey,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<RegistryResponse>> {
    let (_, registry) = load_registry(&state, &key).await?;
    Ok(Json(registry.search(&query.q).collect()))
}

#[api_handler(
    delete,
    path = "/api/catalog/items/{item}",
    params(("item" = String, Path, description = "Identifier to remove")),
    responses(
        (status = OK, description = "Remaining registry", body = RegistryResponse),
        (status = NOT_FOUND, description = "Identifier not in the registry", body = ErrorResponse),
    ),
    tag = CATALOG_TAG,
)]
pub(crate) async fn remove_item(
    State(state): State<ApiState>,
    key: SessionKey,
    Path(item): Path<String>,
) -> ApiResult<Json<RegistryResponse>> {
    let item = ItemId::parse(&item)?;
    let (session, mut registry) = load_registry(&state, &key).await?;

    if !registry.remove(item.as_str()) {
        return Err(ApiError::not_found(format!("'{item}' is not in the catalog")));
    }
    save_registry(&state, &key, &registry, session.selected).await?;

    Ok(Json(registry.iter().collect()))
}

#[api_handler(
    delete,
    path = "/api/catalog/items",
    responses((status = OK, description = "Registry cleared", body = RegistryResponse)),
    tag = CATALOG_TAG,
)]
pub(crate) async fn clear_items(
    State(state): State<ApiState>,
    key: SessionKey,
) -> ApiResult<Json<RegistryResponse>> {
    let registry = ItemRegistry::new();
    save_registry(&state, &key, &registry, Vec::new()).await?;
    Ok(Json(registry.iter().collect()))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(upload_catalog))
        .routes(routes!(search_items))
        .routes(routes!(remove_item))
        .routes(routes!(clear_items))
}
