use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`DTAB__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "DTAB";
const DEFAULT_CONFIG_FILE: &str = "server";

#[dtab_derive::dtab_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration from a file layered with `DTAB__`-prefixed environment variables.
///
/// 1. **Base file**: `path`, or `server` in the working directory. The extension may be
///    omitted (`server` resolves `server.toml`, `server.json`, ...). The file is required.
/// 2. **Environment**: variables such as `DTAB__GENERATOR__TEMPLATE_PATH` override
///    `generator.template_path`; `__` separates nesting levels.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or the merged values do not match `T`.
///
/// # Example
/// ```rust
/// use dtab_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());
    info!("Loading config from {}", path.display());

    Config::builder()
        .add_source(File::from(path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
