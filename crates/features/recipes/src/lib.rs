//! Recipes feature slice: renders one recipe document per item from the configured template.
pub mod document;
mod error;
pub mod template;

pub use document::{RecipeDocument, table_recipe};
pub use error::{RecipeError, RecipeErrorExt};
pub use template::{DEFAULT_TEMPLATE, RenderedRecipe, TemplateCache};

#[cfg(feature = "server")]
use dtab_kernel::domain::config::GeneratorConfig;
#[cfg(feature = "server")]
use dtab_kernel::domain::registry::InitializedSlice;

/// Recipes feature state.
#[dtab_derive::dtab_slice]
pub struct Recipes {
    pub templates: TemplateCache,
}

/// Initialize the recipes feature.
///
/// # Errors
/// Returns an error if the template exists but cannot be read or compiled.
#[cfg(feature = "server")]
pub fn init(config: &GeneratorConfig) -> Result<InitializedSlice, RecipeError> {
    let templates = TemplateCache::load(&config.template_path)?;
    tracing::info!(
        path = %config.template_path.display(),
        loaded = templates.is_loaded(),
        "Recipes slice initialized"
    );

    Ok(Recipes::new(RecipesInner { templates }).into())
}
