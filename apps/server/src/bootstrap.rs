//! Startup file preparation.

use anyhow::{Context, Result};
use dtab::domain::config::GeneratorConfig;
use dtab::features::recipes::DEFAULT_TEMPLATE;
use tracing::{info, warn};

/// Writes the built-in recipe template when `create_default_template` is set and the file
/// is absent. Without the flag a missing template only degrades `/api/generate`.
pub(crate) async fn ensure_template(cfg: &GeneratorConfig) -> Result<()> {
    let path = &cfg.template_path;
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(());
    }

    if !cfg.create_default_template {
        warn!(path = %path.display(), "Recipe template missing; generation stays unavailable until reload");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create template directory {}", parent.display()))?;
    }
    tokio::fs::write(path, DEFAULT_TEMPLATE)
        .await
        .with_context(|| format!("Failed to write default template to {}", path.display()))?;

    info!(path = %path.display(), "Default recipe template written");
    Ok(())
}
