//! Catalog feature slice: parses uploaded catalogs and maintains the session item registry.
mod error;
pub mod parser;
pub mod registry;
pub mod stackable;
pub mod upload;

#[cfg(feature = "server")]
pub mod server;

pub use error::{CatalogError, CatalogErrorExt};
pub use parser::{CatalogParser, ParsedCatalog};
pub use registry::ItemRegistry;
pub use upload::{UploadBatch, UploadReport};

#[cfg(feature = "server")]
use dtab_kernel::domain::registry::InitializedSlice;

/// Catalog feature state.
#[dtab_derive::dtab_slice]
pub struct Catalog {
    pub parser: CatalogParser,
}

/// Initialize the catalog feature.
///
/// # Errors
/// Currently infallible; the signature matches the other slices.
#[cfg(feature = "server")]
pub fn init() -> Result<InitializedSlice, CatalogError> {
    let parser = CatalogParser::default();
    tracing::info!(fields = ?parser.fields(), "Catalog slice initialized");

    Ok(Catalog::new(CatalogInner { parser }).into())
}
