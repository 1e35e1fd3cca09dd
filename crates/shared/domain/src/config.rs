use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level generator configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub assets: AssetsConfig,
    pub sessions: SessionsConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// Recipe rendering and output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Recipe template, read once at startup.
    pub template_path: PathBuf,
    /// Write the built-in template to `template_path` at startup when the file is absent.
    pub create_default_template: bool,
    /// Where the most recent archive is kept for `GET /download`.
    pub output_dir: PathBuf,
    /// Upper bound on items per generation request.
    pub max_items: usize,
}

/// Static files shipped inside behavior/resource packs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Base directory; `icon` and `textures_dir` are resolved against it.
    pub dir: PathBuf,
    pub icon: PathBuf,
    pub textures_dir: PathBuf,
    pub missing: MissingAssetPolicy,
}

/// What to do when a pack asset is not on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAssetPolicy {
    /// Substitute a blank 16x16 PNG and log a warning.
    #[default]
    Placeholder,
    /// Refuse to build packs that need the asset.
    Fail,
}

/// Session persistence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub backend: SessionBackend,
    /// Directory for `<key>.json` session files (file backend only).
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    File,
    Memory,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Archive downloads allowed per client within `download_window_secs`.
    pub download_requests: u32,
    pub download_window_secs: u64,
    /// Maximum request body size for catalog uploads.
    pub max_upload_bytes: usize,
}

/// Subscriber settings consumed by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or filter directives (`info`, `dtab_catalog=debug,info`).
    pub filter: String,
    pub path: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 5096 }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("data/recipe.json.j2"),
            create_default_template: true,
            output_dir: PathBuf::from("output"),
            max_items: 5000,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            icon: PathBuf::from("pack_icon.png"),
            textures_dir: PathBuf::from("textures/blocks"),
            missing: MissingAssetPolicy::default(),
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self { backend: SessionBackend::default(), dir: PathBuf::from("data/sessions") }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { download_requests: 10, download_window_secs: 60, max_upload_bytes: 10 * 1024 * 1024 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_owned(), path: None, json: false }
    }
}
