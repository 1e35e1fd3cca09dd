//! Packaging feature slice: lays rendered recipes out per pack mode and writes zip archives.
pub mod archive;
pub mod assets;
pub mod blocks;
mod error;
pub mod layout;
pub mod manifest;

#[cfg(feature = "server")]
pub mod server;

pub use assets::{AssetKind, PackAssets};
pub use error::{PackagingError, PackagingErrorExt};
pub use layout::{Package, PackageEntry, assemble};

use dtab_kernel::domain::config::AssetsConfig;
#[cfg(feature = "server")]
use dtab_kernel::domain::config::ApiConfig;
#[cfg(feature = "server")]
use dtab_kernel::domain::registry::InitializedSlice;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Packaging feature state.
#[dtab_derive::dtab_slice]
pub struct Packaging {
    /// Swapped wholesale by the admin reload.
    pub assets: Arc<RwLock<PackAssets>>,
    pub assets_config: AssetsConfig,
    pub output_dir: PathBuf,
    pub max_items: usize,
}

impl Packaging {
    /// Re-reads pack assets; the previous set stays in place on error.
    ///
    /// # Errors
    /// Returns [`PackagingError::Io`] when an existing asset cannot be read.
    pub fn reload_assets(&self) -> Result<Vec<AssetKind>, PackagingError> {
        let fresh = PackAssets::load(&self.assets_config)?;
        let missing = fresh.missing();
        *self.assets.write() = fresh;
        Ok(missing)
    }
}

/// Initialize the packaging feature.
///
/// # Errors
/// Returns an error if an existing asset file cannot be read.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, PackagingError> {
    let assets = PackAssets::load(&config.assets)?;
    tracing::info!(
        output_dir = %config.generator.output_dir.display(),
        missing_assets = assets.missing().len(),
        "Packaging slice initialized"
    );

    Ok(Packaging::new(PackagingInner {
        assets: Arc::new(RwLock::new(assets)),
        assets_config: config.assets.clone(),
        output_dir: config.generator.output_dir.clone(),
        max_items: config.generator.max_items,
    })
    .into())
}
