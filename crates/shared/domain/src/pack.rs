use bitflags::bitflags;
use std::fmt;

/// Output layout requested for a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PackMode {
    /// One recipe file per item at the archive root.
    #[default]
    RecipesOnly,
    /// Recipes sorted into category folders plus a README.
    Categorized,
    /// Java datapack layout with `pack.mcmeta`.
    Datapack,
    /// Bedrock behavior pack with the duplicating table block.
    BehaviorPack,
    /// Behavior pack plus its resource pack.
    CompletePack,
}

bitflags! {
    /// Parts of an archive a mode produces.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PackLayers: u8 {
        /// Recipes at the archive root.
        const FLAT = 1 << 0;
        /// Recipes under category folders, with a README.
        const CATEGORIZED = 1 << 1;
        /// Recipes under the datapack tree, with `pack.mcmeta`.
        const DATAPACK = 1 << 2;
        /// Behavior pack tree: manifest, recipes, block definition, icon.
        const BEHAVIOR = 1 << 3;
        /// Resource pack tree: manifest, textures, model, texts, icon.
        const RESOURCE = 1 << 4;

        /// Layers that read static assets from disk.
        const NEEDS_ASSETS = Self::BEHAVIOR.bits() | Self::RESOURCE.bits();
    }
}

impl PackMode {
    pub const ALL: [Self; 5] =
        [Self::RecipesOnly, Self::Categorized, Self::Datapack, Self::BehaviorPack, Self::CompletePack];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecipesOnly => "recipes-only",
            Self::Categorized => "categorized",
            Self::Datapack => "datapack",
            Self::BehaviorPack => "behavior-pack",
            Self::CompletePack => "complete-pack",
        }
    }

    /// Accepts canonical names and the legacy aliases.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "recipes-only" | "standard" => Some(Self::RecipesOnly),
            "categorized" | "custom" => Some(Self::Categorized),
            "datapack" => Some(Self::Datapack),
            "behavior-pack" | "behavior_pack" => Some(Self::BehaviorPack),
            "complete-pack" | "complete_pack" => Some(Self::CompletePack),
            _ => None,
        }
    }

    #[must_use]
    pub const fn layers(self) -> PackLayers {
        match self {
            Self::RecipesOnly => PackLayers::FLAT,
            Self::Categorized => PackLayers::CATEGORIZED,
            Self::Datapack => PackLayers::DATAPACK,
            Self::BehaviorPack => PackLayers::BEHAVIOR,
            Self::CompletePack => PackLayers::BEHAVIOR.union(PackLayers::RESOURCE),
        }
    }

    /// Download name offered to the browser.
    #[must_use]
    pub fn archive_name(self) -> String {
        format!("minecraft_recipes_{}.zip", self.as_str())
    }
}

impl fmt::Display for PackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
