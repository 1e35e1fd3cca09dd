use crate::item::ItemError;
use crate::session_key::SessionKeyError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use dtab_derive::api_model;
use std::borrow::Cow;
use tracing::{debug, error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

/// Request-boundary error: every slice error is mapped to one of these categories.
#[dtab_derive::dtab_error]
pub enum ApiError {
    /// Malformed or empty upload.
    #[error("Parse error{}: {message}", format_context(.context))]
    Parse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Malformed identifier, key, or request value.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The recipe template is not available.
    #[error("Template missing{}: {message}", format_context(.context))]
    TemplateMissing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No items selected, or a required pack asset is missing.
    #[error("Packaging error{}: {message}", format_context(.context))]
    Packaging { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Rate limit exceeded{}, retry after {retry_after}s", format_context(.context))]
    RateLimited { retry_after: u64, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub fn parse(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Parse { message: message.into(), context: None }
    }

    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    pub fn template_missing(message: impl Into<Cow<'static, str>>) -> Self {
        Self::TemplateMissing { message: message.into(), context: None }
    }

    pub fn packaging(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Packaging { message: message.into(), context: None }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Parse { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::TemplateMissing { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Packaging { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse_error",
            Self::Validation { .. } => "validation_error",
            Self::TemplateMissing { .. } => "template_missing",
            Self::Packaging { .. } => "packaging_error",
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::Internal { .. } => "internal",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Internal { .. } if !cfg!(debug_assertions) => {
                "An internal error occurred".to_owned()
            },
            _ => self.to_string(),
        }
    }
}

#[api_model(rename_all = "snake_case")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[api_model(rename_all = "snake_case")]
pub struct ErrorDetail {
    pub category: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.category();

        if status.is_server_error() {
            error!(error = %self, category, "Request failed");
        } else if matches!(self, Self::RateLimited { .. }) {
            warn!(error = %self, category, "Request rejected");
        } else {
            debug!(error = %self, category, "Request rejected");
        }

        let retry_after = match &self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                category: category.to_owned(),
                message: self.public_message(),
                retry_after,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<SessionKeyError> for ApiError {
    fn from(err: SessionKeyError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_statuses() {
        assert_eq!(ApiError::parse("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::packaging("x").status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::template_missing("x").status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::RateLimited { retry_after: 3, context: None }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn rate_limit_sets_retry_after_header() {
        let response = ApiError::RateLimited { retry_after: 7, context: None }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "7");
    }

    #[tokio::test]
    async fn retry_hint_is_snake_case_in_body() {
        use http_body_util::BodyExt;

        let response = ApiError::RateLimited { retry_after: 4, context: None }.into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["category"], "rate_limited");
        assert_eq!(body["error"]["retry_after"], 4);
        assert!(body["error"].get("retryAfter").is_none());
    }

    #[test]
    fn item_errors_become_validation_errors() {
        let err: ApiError = crate::item::ItemId::parse("a b").unwrap_err().into();
        assert_eq!(err.category(), "validation_error");
    }
}
