use std::borrow::Cow;

/// Session store failures.
#[dtab_derive::dtab_error]
pub enum SessionError {
    #[error("Session I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Session encoding error{}: {source}", format_context(.context))]
    Encoding { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal session error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<SessionError> for dtab_kernel::server::ApiError {
    fn from(err: SessionError) -> Self {
        Self::Internal { message: err.to_string().into(), context: None }
    }
}
