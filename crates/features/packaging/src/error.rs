use std::borrow::Cow;

#[dtab_derive::dtab_error]
pub enum PackagingError {
    /// Nothing to package.
    #[error("Packaging error{}: {message}", format_context(.context))]
    Empty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A static asset required by the mode is absent and the policy is `fail`.
    #[error("Missing pack asset{}: {message}", format_context(.context))]
    MissingAsset { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Archive error{}: {source}", format_context(.context))]
    Zip { source: zip::result::ZipError, context: Option<Cow<'static, str>> },

    #[error("Packaging I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Pack document error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal packaging error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<PackagingError> for dtab_kernel::server::ApiError {
    fn from(err: PackagingError) -> Self {
        match err {
            PackagingError::Empty { .. } | PackagingError::MissingAsset { .. } => {
                Self::packaging(err.to_string())
            },
            _ => Self::Internal { message: err.to_string().into(), context: None },
        }
    }
}
