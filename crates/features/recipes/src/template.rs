//! Template loading and rendering.
//!
//! The template is compiled once. Only [`TemplateCache::reload`] replaces it, and a failed
//! reload leaves the previous template in place.

use crate::document::RecipeDocument;
use crate::error::{RecipeError, RecipeErrorExt};
use dtab_kernel::item::ItemId;
use handlebars::Handlebars;
use parking_lot::RwLock;
use serde_json::json;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TEMPLATE_NAME: &str = "recipe";

/// Written to the configured path by the deployment bootstrap when no template exists.
pub const DEFAULT_TEMPLATE: &str = r#"{
    "format_version": "1.12",
    "minecraft:recipe_shaped": {
        "description": {
            "identifier": "duplicatingtable:{{ result_item }}_19"
        },
        "tags": [
            "duplicating_table"
        ],
        "pattern": [
            "X"
        ],
        "key": {
            "X": {
                "item": "minecraft:{{ result_item }}"
            }
        },
        "result": {
            "item": "minecraft:{{ result_item }}",
            "count": 2
        }
    }
}
"#;

/// A document rendered for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecipe {
    pub item: ItemId,
    pub document: RecipeDocument,
}

#[derive(Clone)]
pub struct TemplateCache {
    path: PathBuf,
    compiled: Arc<RwLock<Option<Handlebars<'static>>>>,
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCache")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl TemplateCache {
    /// Reads and compiles the template at `path`. An absent file is not an error: the cache
    /// starts empty and every render reports [`RecipeError::TemplateMissing`] until a reload
    /// finds the file.
    ///
    /// # Errors
    /// Returns [`RecipeError`] when the file exists but cannot be read or compiled.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RecipeError> {
        let path = path.into();
        let compiled = match read_template(&path)? {
            Some(source) => Some(compile(&source)?),
            None => {
                tracing::warn!(path = %path.display(), "Recipe template not found");
                None
            },
        };
        Ok(Self { path, compiled: Arc::new(RwLock::new(compiled)) })
    }

    /// Cache compiled from an in-memory template, not backed by a file.
    ///
    /// # Errors
    /// Returns [`RecipeError::Template`] when `source` does not compile.
    pub fn from_source(source: &str) -> Result<Self, RecipeError> {
        Ok(Self { path: PathBuf::new(), compiled: Arc::new(RwLock::new(Some(compile(source)?))) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.compiled.read().is_some()
    }

    /// Re-reads the file and swaps the compiled template in.
    ///
    /// # Errors
    /// Returns [`RecipeError`] when the file is absent, unreadable or does not compile; the
    /// previous template stays active.
    pub fn reload(&self) -> Result<(), RecipeError> {
        let source = read_template(&self.path)?.ok_or_else(|| missing(&self.path))?;
        let fresh = compile(&source)?;
        *self.compiled.write() = Some(fresh);
        tracing::info!(path = %self.path.display(), "Recipe template reloaded");
        Ok(())
    }

    /// Renders the recipe for `item`.
    ///
    /// # Errors
    /// Returns [`RecipeError::TemplateMissing`] without a template, [`RecipeError::Render`] when
    /// a placeholder cannot be resolved and [`RecipeError::Document`] when the output does not
    /// match the recipe schema.
    pub fn render(&self, item: &ItemId) -> Result<RecipeDocument, RecipeError> {
        let guard = self.compiled.read();
        let registry = guard.as_ref().ok_or_else(|| missing(&self.path))?;

        let text = registry
            .render(TEMPLATE_NAME, &json!({ "result_item": item.as_str() }))
            .context(format!("rendering {item}"))?;
        serde_json::from_str(&text).context(format!("recipe for {item}"))
    }

    /// Renders every item in order, stopping at the first failure.
    ///
    /// # Errors
    /// See [`TemplateCache::render`].
    pub fn render_all<'a, I>(&self, items: I) -> Result<Vec<RenderedRecipe>, RecipeError>
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        items
            .into_iter()
            .map(|item| Ok(RenderedRecipe { item: item.clone(), document: self.render(item)? }))
            .collect()
    }
}

fn read_template(path: &Path) -> Result<Option<String>, RecipeError> {
    match std::fs::read_to_string(path) {
        Ok(source) => Ok(Some(source)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(RecipeError::Io {
            source,
            context: Some(format!("reading {}", path.display()).into()),
        }),
    }
}

fn compile(source: &str) -> Result<Handlebars<'static>, RecipeError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry.register_template_string(TEMPLATE_NAME, source).context("compiling recipe template")?;
    Ok(registry)
}

fn missing(path: &Path) -> RecipeError {
    RecipeError::TemplateMissing {
        message: format!("'{}' not found", path.display()).into(),
        context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ItemId {
        ItemId::parse(name).unwrap()
    }

    #[test]
    fn default_template_derives_fields_from_item() {
        let cache = TemplateCache::from_source(DEFAULT_TEMPLATE).unwrap();
        let doc = cache.render(&id("iron_ingot")).unwrap();

        assert_eq!(doc.format_version, "1.12");
        assert_eq!(doc.identifier(), "duplicatingtable:iron_ingot_19");
        assert_eq!(doc.recipe.tags, ["duplicating_table"]);
        assert_eq!(doc.recipe.pattern, ["X"]);
        assert_eq!(doc.recipe.key["X"].item, "minecraft:iron_ingot");
        assert_eq!(doc.result().item, "minecraft:iron_ingot");
        assert_eq!(doc.result().count, 2);
    }

    #[test]
    fn rendering_is_idempotent() {
        let cache = TemplateCache::from_source(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(cache.render(&id("stick")).unwrap(), cache.render(&id("stick")).unwrap());
    }

    #[test]
    fn unknown_placeholders_fail_in_strict_mode() {
        let cache = TemplateCache::from_source(r#"{"format_version": "{{ version }}"}"#).unwrap();
        assert!(matches!(cache.render(&id("stick")), Err(RecipeError::Render { .. })));
    }

    #[test]
    fn off_schema_output_names_the_item() {
        let cache = TemplateCache::from_source(r#"{"item": "{{ result_item }}"}"#).unwrap();
        let err = cache.render(&id("stick")).unwrap_err();
        assert!(matches!(err, RecipeError::Document { .. }));
        assert!(err.to_string().contains("recipe for stick"));
    }

    #[test]
    fn bad_syntax_is_rejected() {
        assert!(matches!(TemplateCache::from_source("{{#if}}"), Err(RecipeError::Template { .. })));
    }
}
