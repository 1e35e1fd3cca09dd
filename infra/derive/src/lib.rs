#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros shared by every crate in the workspace:
//!
//! * [`dtab_error`] turns an enum into a `thiserror` error with `.context()` support.
//! * [`dtab_slice`] turns a struct into a registrable feature slice handle.
//! * [`api_model`] and [`api_handler`] wire DTOs and handlers into `OpenAPI`.
//! * [`main`] (re-exported by `dtab-runtime`) bootstraps a Tokio runtime profile.
//!
//! Doc examples are `ignore`d here because a proc-macro crate cannot use its own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Bootstraps an `async fn main` on a pre-configured Tokio runtime.
///
/// Accepted profiles: `high_performance`, `memory_efficient`, `default` (or no argument).
/// The function must return a `Result`; runtime construction errors are propagated with `?`.
///
/// ```rust,ignore
/// #[dtab_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares an API data model.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives `utoipa::ToSchema`
/// under the `server` feature, and applies `rename_all = "camelCase"` plus
/// `deny_unknown_fields` unless overridden.
///
/// ```rust,ignore
/// use dtab_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct UploadResponse {
///     pub items: Vec<String>,
///     pub unique_items: usize,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attaches `utoipa::path` metadata to an Axum handler when the `server` feature is on.
///
/// Arguments are passed through verbatim (`get`, `post`, `path = "..."`, `responses(...)`,
/// `tag = ...`).
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)), tag = "System")]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Defines a crate error enum.
///
/// Every variant must use named fields. Variants that carry a `context:
/// Option<Cow<'static, str>>` field can be annotated after the fact through the generated
/// `<Name>Ext::context` method; variants with a `source` field (or a field marked
/// `#[source]`/`#[from]`) additionally get a `From<Source>` impl so `?` works on upstream
/// errors. An `Internal { message, context }` variant enables `From<&'static str>` and
/// `From<String>`.
///
/// The expansion also emits a private `format_context` helper meant for the display strings.
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[dtab_derive::dtab_error]
/// pub enum CatalogError {
///     #[error("Catalog parse error{}: {message}", format_context(.context))]
///     Parse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Catalog JSON error{}: {source}", format_context(.context))]
///     Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal catalog error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// let parsed: serde_json::Value = serde_json::from_slice(bytes).context("catalog.json")?;
/// ```
#[proc_macro_attribute]
pub fn dtab_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Declares a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as a cheap `Arc`
/// wrapper that derefs to the inner state, implements `FeatureSlice`, and converts into an
/// `InitializedSlice` for registration in the API state.
///
/// ```rust,ignore
/// #[dtab_derive::dtab_slice]
/// pub struct Catalog {
///     pub parser: CatalogParser,
/// }
///
/// let slice = Catalog::new(CatalogInner { parser: CatalogParser::default() });
/// let initialized: InitializedSlice = slice.into();
/// ```
#[proc_macro_attribute]
pub fn dtab_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
