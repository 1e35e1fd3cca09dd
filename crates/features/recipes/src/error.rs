use std::borrow::Cow;

#[dtab_derive::dtab_error]
pub enum RecipeError {
    /// No template is loaded.
    #[error("Template missing{}: {message}", format_context(.context))]
    TemplateMissing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Template syntax error{}: {source}", format_context(.context))]
    Template { source: handlebars::TemplateError, context: Option<Cow<'static, str>> },

    #[error("Template render error{}: {source}", format_context(.context))]
    Render { source: handlebars::RenderError, context: Option<Cow<'static, str>> },

    /// Rendered text is not a recipe document.
    #[error("Rendered recipe is invalid{}: {source}", format_context(.context))]
    Document { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Template I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal recipe error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<RecipeError> for dtab_kernel::server::ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::TemplateMissing { .. } | RecipeError::Template { .. } => {
                Self::template_missing(err.to_string())
            },
            _ => Self::Internal { message: err.to_string().into(), context: None },
        }
    }
}
