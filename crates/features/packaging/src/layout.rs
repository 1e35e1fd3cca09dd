//! Archive layouts for every [`PackMode`].

use crate::assets::{AssetKind, PackAssets};
use crate::blocks;
use crate::error::PackagingError;
use crate::manifest::{Manifest, PackIds};
use dtab_kernel::domain::constants::{
    BEHAVIOR_PACK_DIR, DATAPACK_RECIPES_DIR, RECIPE_FILE_SUFFIX, RESOURCE_PACK_DIR,
    TABLE_RECIPE_FILE,
};
use dtab_kernel::domain::pack::{PackLayers, PackMode};
use dtab_kernel::item::{ItemId, safe_file_stem};
use dtab_recipes::{RenderedRecipe, table_recipe};
use fxhash::FxHashSet;
use serde::Serialize;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// One file of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub path: String,
    pub contents: Vec<u8>,
}

/// Files of one archive, in write order.
#[derive(Debug, Clone)]
pub struct Package {
    pub mode: PackMode,
    pub entries: Vec<PackageEntry>,
    /// Generated item recipes; the table recipe is not counted.
    pub recipe_count: usize,
}

impl Package {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.iter().find(|entry| entry.path == path).map(|entry| entry.contents.as_slice())
    }

    /// Deflates every entry into an in-memory zip.
    ///
    /// # Errors
    /// Returns [`PackagingError::Zip`] or [`PackagingError::Io`] when writing fails.
    pub fn to_zip(&self) -> Result<Vec<u8>, PackagingError> {
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            writer.start_file(entry.path.as_str(), options)?;
            writer.write_all(&entry.contents)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// Lays out `recipes` for `mode`.
///
/// # Errors
/// Returns [`PackagingError::Empty`] when `recipes` is empty and
/// [`PackagingError::MissingAsset`] when the mode needs an asset the policy will not replace.
pub fn assemble(
    recipes: &[RenderedRecipe],
    mode: PackMode,
    assets: &PackAssets,
) -> Result<Package, PackagingError> {
    if recipes.is_empty() {
        return Err(PackagingError::Empty { message: "no items selected".into(), context: None });
    }

    let layers = mode.layers();
    assets.ensure(layers)?;

    let mut builder = Builder::default();

    if layers.contains(PackLayers::FLAT) {
        builder.recipes(recipes, |_| String::new())?;
    }
    if layers.contains(PackLayers::CATEGORIZED) {
        builder.recipes(recipes, |item| format!("{}/", blocks::category_for(item)))?;
        builder.text("README.md", blocks::categorized_readme(recipes.len()));
    }
    if layers.contains(PackLayers::DATAPACK) {
        builder.recipes(recipes, |_| format!("{DATAPACK_RECIPES_DIR}/"))?;
        builder.json("pack.mcmeta", &blocks::pack_mcmeta())?;
    }

    let ids = PackIds::generate();
    if layers.contains(PackLayers::BEHAVIOR) {
        let root = BEHAVIOR_PACK_DIR;
        builder.json(format!("{root}/manifest.json"), &Manifest::behavior(&ids))?;
        builder.recipes(recipes, |_| format!("{root}/recipes/"))?;
        builder.json(format!("{root}/recipes/{TABLE_RECIPE_FILE}"), &table_recipe())?;
        builder.json(format!("{root}/blocks/duplicating_table.json"), &blocks::behavior_block())?;
        builder.file(format!("{root}/pack_icon.png"), assets.get(AssetKind::Icon)?);
    }
    if layers.contains(PackLayers::RESOURCE) {
        let root = RESOURCE_PACK_DIR;
        builder.json(format!("{root}/manifest.json"), &Manifest::resource(&ids))?;
        builder.json(format!("{root}/blocks.json"), &blocks::resource_blocks())?;
        builder.text(format!("{root}/texts/languages.json"), blocks::LANGUAGES);
        builder.text(format!("{root}/texts/en_US.lang"), blocks::en_us_lang());
        builder.json(format!("{root}/textures/terrain_texture.json"), &blocks::terrain_texture())?;
        for kind in AssetKind::TEXTURES {
            builder.file(format!("{root}/textures/blocks/{}", kind.file_name()), assets.get(kind)?);
        }
        builder.json(
            format!("{root}/models/blocks/duplicating_table.geo.json"),
            &blocks::geometry(),
        )?;
        builder.file(format!("{root}/pack_icon.png"), assets.get(AssetKind::Icon)?);
    }

    tracing::debug!(%mode, recipes = recipes.len(), files = builder.entries.len(), "Package assembled");
    Ok(Package { mode, entries: builder.entries, recipe_count: recipes.len() })
}

#[derive(Default)]
struct Builder {
    entries: Vec<PackageEntry>,
    /// Lowercased paths already used, so names differing only by case do not clash on
    /// case-insensitive file systems.
    taken: FxHashSet<String>,
}

impl Builder {
    fn recipes<F>(&mut self, recipes: &[RenderedRecipe], dir: F) -> Result<(), PackagingError>
    where
        F: Fn(&ItemId) -> String,
    {
        for recipe in recipes {
            let dir = dir(&recipe.item);
            let path = self.unique_recipe_path(&dir, &recipe.item);
            let contents = recipe.document.to_json().map_err(|source| PackagingError::Json {
                source,
                context: Some(format!("recipe for {}", recipe.item).into()),
            })?;
            self.push(path, contents);
        }
        Ok(())
    }

    fn unique_recipe_path(&self, dir: &str, item: &ItemId) -> String {
        let first = format!("{dir}{}", item.recipe_file_name());
        if !self.taken.contains(&first.to_lowercase()) {
            return first;
        }

        let stem = safe_file_stem(item.as_str());
        (2..)
            .map(|n| format!("{dir}{stem}_{n}{RECIPE_FILE_SUFFIX}"))
            .find(|path| !self.taken.contains(&path.to_lowercase()))
            .unwrap_or(first)
    }

    fn json<T: Serialize>(&mut self, path: impl Into<String>, value: &T) -> Result<(), PackagingError> {
        let path = path.into();
        let contents = serde_json::to_vec_pretty(value)
            .map_err(|source| PackagingError::Json { source, context: Some(path.clone().into()) })?;
        self.push(path, contents);
        Ok(())
    }

    fn text(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.push(path.into(), contents.into().into_bytes());
    }

    fn file(&mut self, path: impl Into<String>, contents: &[u8]) {
        self.push(path.into(), contents.to_vec());
    }

    fn push(&mut self, path: String, contents: Vec<u8>) {
        self.taken.insert(path.to_lowercase());
        self.entries.push(PackageEntry { path, contents });
    }
}
