//! # Logger
//!
//! Installs the process-wide `tracing` subscriber: a compact ANSI console layer, an optional
//! non-blocking rolling file layer (plain or JSON), and an [`EnvFilter`] that honours
//! `RUST_LOG` on top of the programmatic default.
//!
//! A log file path can only be configured once a name is set, and rotation/JSON settings only
//! exist once a path is set; the builder enforces both at compile time.
//!
//! ```rust
//! # use dtab_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("dtab-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct Settings {
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    directives: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            directives: None,
        }
    }
}

mod state {
    pub trait Sealed {}

    #[derive(Debug)]
    pub struct Unnamed;
    #[derive(Debug)]
    pub struct Named(pub(crate) String);
    #[derive(Debug)]
    pub struct ConsoleOnly;
    #[derive(Debug)]
    pub struct WithFile;

    impl Sealed for Unnamed {}
    impl Sealed for Named {}
    impl Sealed for ConsoleOnly {}
    impl Sealed for WithFile {}
}

pub use state::{ConsoleOnly, Named, Unnamed, WithFile};

/// Builder for the global subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: state::Sealed = Unnamed, F: state::Sealed = ConsoleOnly> {
    settings: Settings,
    name: N,
    output: PhantomData<F>,
}

impl<F: state::Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the logger; the name prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), output: PhantomData }
    }
}

impl<F: state::Sealed> LoggerBuilder<Named, F> {
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Filter directives such as `dtab_catalog=debug,tower_http=info`.
    ///
    /// Parsed during [`LoggerBuilder::init`]; a plain level (`"warn"`) is also accepted.
    #[must_use]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.settings.directives = Some(directives.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Writes logs to rolling files under `path` as well.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut settings = self.settings;
        settings.path = Some(path.into());
        LoggerBuilder { settings, name: self.name, output: PhantomData }
    }

    /// Installs the subscriber.
    ///
    /// Keep the returned [`Logger`] alive: dropping it stops the file writer thread.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero retained files, bad
    ///   filter directives, or no enabled output.
    /// * [`LoggerError::Appender`] if the log directory cannot be used.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        validate(&settings, &name)?;

        let filter = env_filter(&settings)?;
        let mut layers = Vec::new();

        if settings.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &settings.path {
            Some(path) => {
                fs::create_dir_all(path).map_err(|e| LoggerError::Internal {
                    message: e.to_string().into(),
                    context: Some(format!("Failed to create path: {}", path.display()).into()),
                })?;

                let appender = RollingFileAppender::builder()
                    .rotation(settings.rotation.clone())
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(settings.max_files)
                    .build(path)?;

                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if settings.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

impl LoggerBuilder<Named, WithFile> {
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Emits file output as JSON lines; the console layer stays human readable.
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.settings.json = true;
        self
    }
}

/// Handle to the installed subscriber.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, output: PhantomData }
    }

    /// Whether a file writer is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }
    if settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn env_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    match &settings.directives {
        None => Ok(builder.from_env_lossy()),
        Some(directives) => builder.parse(directives).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{directives}': {e}").into(),
                context: None,
            }
        }),
    }
}
