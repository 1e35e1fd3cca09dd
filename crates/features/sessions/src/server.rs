//! `GET /api/last-session` and `POST /api/update-session`.

use crate::{Session, Sessions};
use axum::Json;
use axum::extract::State;
use dtab_derive::{api_handler, api_model};
use dtab_kernel::domain::constants::SESSIONS_TAG;
use dtab_kernel::item::{ItemError, ItemId};
use dtab_kernel::server::{ApiJson, ApiResult, ApiState, ErrorResponse};
use dtab_kernel::session_key::SessionKey;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model(rename_all = "snake_case")]
/// Last saved working set.
pub struct SessionResponse {
    pub items: Vec<String>,
    pub selected: Vec<String>,
    /// RFC 3339 save time, `null` when nothing was saved.
    pub timestamp: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            items: session.items.into_iter().map(ItemId::into_inner).collect(),
            selected: session.selected.into_iter().map(ItemId::into_inner).collect(),
            timestamp: session.timestamp.map(|t| t.to_rfc3339()),
        }
    }
}

#[api_model(rename_all = "snake_case")]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub selected: Vec<String>,
}

#[api_model(rename_all = "snake_case")]
pub struct UpdateSessionResponse {
    pub success: bool,
    pub message: String,
}

/// Validates request identifiers, skipping blank entries.
///
/// # Errors
/// Returns the first [`ItemError`] encountered.
pub fn parse_items(raw: &[String]) -> Result<Vec<ItemId>, ItemError> {
    raw.iter().filter(|item| !item.trim().is_empty()).map(|item| ItemId::parse(item)).collect()
}

#[api_handler(
    get,
    path = "/api/last-session",
    params(("x-session-id" = Option<String>, Header, description = "Session key")),
    responses(
        (status = OK, description = "Last saved session, empty when none exists", body = SessionResponse),
        (status = BAD_REQUEST, description = "Malformed session key", body = ErrorResponse),
    ),
    tag = SESSIONS_TAG,
)]
pub(crate) async fn last_session(
    State(state): State<ApiState>,
    key: SessionKey,
) -> ApiResult<Json<SessionResponse>> {
    let sessions = state.try_get_slice::<Sessions>()?;
    let session = sessions.store.load(&key).await?;
    Ok(Json(session.into()))
}

#[api_handler(
    post,
    path = "/api/update-session",
    request_body = UpdateSessionRequest,
    responses(
        (status = OK, description = "Session saved", body = UpdateSessionResponse),
        (status = BAD_REQUEST, description = "Invalid identifier or session key", body = ErrorResponse),
    ),
    tag = SESSIONS_TAG,
)]
pub(crate) async fn update_session(
    State(state): State<ApiState>,
    key: SessionKey,
    ApiJson(request): ApiJson<UpdateSessionRequest>,
) -> ApiResult<Json<UpdateSessionResponse>> {
    let items = parse_items(&request.items)?;
    let selected = parse_items(&request.selected)?;

    let sessions = state.try_get_slice::<Sessions>()?;
    sessions.store.put(&key, &Session::new(items, selected)).await?;

    Ok(Json(UpdateSessionResponse {
        success: true,
        message: "Session updated successfully".to_owned(),
    }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(last_session)).routes(routes!(update_session))
}
