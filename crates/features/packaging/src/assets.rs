//! Static files shipped inside behavior and resource packs.

use crate::error::PackagingError;
use dtab_kernel::domain::config::{AssetsConfig, MissingAssetPolicy};
use dtab_kernel::domain::pack::PackLayers;
use std::io::ErrorKind;
use std::path::Path;

/// Transparent 16x16 PNG used when an asset is absent.
pub const PLACEHOLDER_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x10\x00\x00\x00\x10\x08\x06\x00\x00\x00\x1f\xf3\xffa\x00\x00\x00\x1dIDATx\x9cc\xf8\x0f\x00\x01\x01\x01\x00\x18\xdd\x8d\xb4\x1c\x00\x00\x00\x00IEND\xaeB`\x82";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Icon,
    FrontTexture,
    SideTexture,
    TopTexture,
}

impl AssetKind {
    pub const TEXTURES: [Self; 3] = [Self::FrontTexture, Self::SideTexture, Self::TopTexture];

    /// File name inside the pack.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Icon => "pack_icon.png",
            Self::FrontTexture => "duplicating_table_front.png",
            Self::SideTexture => "duplicating_table_side.png",
            Self::TopTexture => "duplicating_table_top.png",
        }
    }

    /// Assets read by the given layers.
    #[must_use]
    pub fn required_by(layers: PackLayers) -> Vec<Self> {
        let mut kinds = Vec::new();
        if layers.intersects(PackLayers::NEEDS_ASSETS) {
            kinds.push(Self::Icon);
        }
        if layers.contains(PackLayers::RESOURCE) {
            kinds.extend(Self::TEXTURES);
        }
        kinds
    }
}

/// Asset bytes read at startup (and on admin reload).
#[derive(Debug, Clone, Default)]
pub struct PackAssets {
    icon: Option<Vec<u8>>,
    front: Option<Vec<u8>>,
    side: Option<Vec<u8>>,
    top: Option<Vec<u8>>,
    policy: MissingAssetPolicy,
}

impl PackAssets {
    /// No assets on hand; every lookup follows `policy`.
    #[must_use]
    pub fn empty(policy: MissingAssetPolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Reads the icon and textures configured in `config`. Absent files are remembered as
    /// missing rather than failing.
    ///
    /// # Errors
    /// Returns [`PackagingError::Io`] when a file exists but cannot be read.
    pub fn load(config: &AssetsConfig) -> Result<Self, PackagingError> {
        let mut assets = Self::empty(config.missing);
        assets.icon = read_optional(&config.dir.join(&config.icon))?;
        for kind in AssetKind::TEXTURES {
            let path = config.dir.join(&config.textures_dir).join(kind.file_name());
            *assets.slot(kind) = read_optional(&path)?;
        }

        let missing = assets.missing();
        if !missing.is_empty() {
            tracing::warn!(?missing, policy = ?config.missing, "Some pack assets are missing");
        }
        Ok(assets)
    }

    #[must_use]
    pub fn with(mut self, kind: AssetKind, bytes: impl Into<Vec<u8>>) -> Self {
        *self.slot(kind) = Some(bytes.into());
        self
    }

    #[must_use]
    pub const fn policy(&self) -> MissingAssetPolicy {
        self.policy
    }

    #[must_use]
    pub fn missing(&self) -> Vec<AssetKind> {
        [AssetKind::Icon, AssetKind::FrontTexture, AssetKind::SideTexture, AssetKind::TopTexture]
            .into_iter()
            .filter(|kind| self.stored(*kind).is_none())
            .collect()
    }

    /// Fails when `layers` need an absent asset and the policy is `fail`.
    ///
    /// # Errors
    /// Returns [`PackagingError::MissingAsset`] naming the first absent asset.
    pub fn ensure(&self, layers: PackLayers) -> Result<(), PackagingError> {
        AssetKind::required_by(layers).into_iter().try_for_each(|kind| self.get(kind).map(drop))
    }

    /// Asset bytes, or the placeholder when absent and the policy allows it.
    ///
    /// # Errors
    /// Returns [`PackagingError::MissingAsset`] when absent under the `fail` policy.
    pub fn get(&self, kind: AssetKind) -> Result<&[u8], PackagingError> {
        match (self.stored(kind), self.policy) {
            (Some(bytes), _) => Ok(bytes),
            (None, MissingAssetPolicy::Placeholder) => {
                tracing::warn!(asset = kind.file_name(), "Using placeholder for missing asset");
                Ok(PLACEHOLDER_PNG)
            },
            (None, MissingAssetPolicy::Fail) => Err(PackagingError::MissingAsset {
                message: kind.file_name().into(),
                context: None,
            }),
        }
    }

    fn stored(&self, kind: AssetKind) -> Option<&[u8]> {
        match kind {
            AssetKind::Icon => self.icon.as_deref(),
            AssetKind::FrontTexture => self.front.as_deref(),
            AssetKind::SideTexture => self.side.as_deref(),
            AssetKind::TopTexture => self.top.as_deref(),
        }
    }

    const fn slot(&mut self, kind: AssetKind) -> &mut Option<Vec<u8>> {
        match kind {
            AssetKind::Icon => &mut self.icon,
            AssetKind::FrontTexture => &mut self.front,
            AssetKind::SideTexture => &mut self.side,
            AssetKind::TopTexture => &mut self.top,
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, PackagingError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PackagingError::Io {
            source,
            context: Some(format!("reading {}", path.display()).into()),
        }),
    }
}
