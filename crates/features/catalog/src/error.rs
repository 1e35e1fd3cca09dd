use std::borrow::Cow;

/// Catalog parsing failures.
#[dtab_derive::dtab_error]
pub enum CatalogError {
    #[error("Catalog is not valid UTF-8{}: {source}", format_context(.context))]
    Encoding { source: std::str::Utf8Error, context: Option<Cow<'static, str>> },

    #[error("Catalog is not valid JSON{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The document has no recognized items array.
    #[error("No items array found{}: {message}", format_context(.context))]
    NoItemsArray { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unsupported catalog format{}: {message}", format_context(.context))]
    UnsupportedFormat { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No uploaded file produced a single item.
    #[error("Empty upload{}: {message}", format_context(.context))]
    Empty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CatalogError {
    /// Short reason shown next to a failed file name.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Encoding { .. } => "not valid UTF-8",
            Self::Json { .. } => "invalid JSON",
            Self::NoItemsArray { .. } => "no items array",
            Self::UnsupportedFormat { .. } => "unsupported format",
            Self::Empty { .. } => "no valid items found",
            Self::Internal { .. } => "processing error",
        }
    }
}

#[cfg(feature = "server")]
impl From<CatalogError> for dtab_kernel::server::ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Internal { .. } => {
                Self::Internal { message: err.to_string().into(), context: None }
            },
            _ => Self::parse(err.to_string()),
        }
    }
}
