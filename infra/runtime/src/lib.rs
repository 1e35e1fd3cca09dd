//! # Runtime
//!
//! Tokio runtime profiles for the workspace binaries.
//!
//! * [`RuntimeConfig::high_performance`] for the HTTP server: all cores, larger stacks,
//!   long keep-alive so bursts of archive builds reuse warm threads.
//! * [`RuntimeConfig::memory_efficient`] for small containers: half the cores, smaller stacks.
//!
//! ```rust,ignore
//! #[dtab_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use dtab_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const FALLBACK_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_THREAD_NAME: &str = "dtab-worker";

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// Worker count from `TOKIO_WORKER_THREADS`, falling back to available parallelism.
fn detected_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| (1..=MAX_WORKER_THREADS).contains(&n))
            .unwrap_or_else(|| {
                available_parallelism().map_or(FALLBACK_WORKER_THREADS, std::num::NonZero::get)
            })
    })
}

/// Multi-threaded runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detected_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Preset for the HTTP server.
    #[must_use]
    pub fn high_performance() -> Self {
        Self {
            stack_size: 4 * 1024 * 1024,
            thread_name: "dtab-hp".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
            ..Self::default()
        }
    }

    /// Preset for constrained deployments.
    #[must_use]
    pub fn memory_efficient() -> Self {
        Self {
            worker_threads: (detected_worker_threads() / 2).max(1),
            stack_size: 2 * 1024 * 1024,
            thread_name: "dtab-mem".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = clamp_threads(threads);
        self
    }

    #[must_use]
    pub const fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = clamp_stack(size);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Copy with every field forced into its valid range.
    fn normalized(&self) -> Self {
        let thread_name = if self.thread_name.trim().is_empty() {
            DEFAULT_THREAD_NAME.to_owned()
        } else {
            self.thread_name.clone()
        };

        Self {
            worker_threads: clamp_threads(self.worker_threads),
            stack_size: clamp_stack(self.stack_size),
            thread_name,
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

const fn clamp_threads(threads: usize) -> usize {
    if threads == 0 {
        1
    } else if threads > MAX_WORKER_THREADS {
        MAX_WORKER_THREADS
    } else {
        threads
    }
}

const fn clamp_stack(size: usize) -> usize {
    if size < MIN_STACK_SIZE {
        MIN_STACK_SIZE
    } else if size > MAX_STACK_SIZE {
        MAX_STACK_SIZE
    } else {
        size
    }
}

/// Builds a multi-threaded runtime with I/O and timers enabled.
///
/// # Errors
/// Returns an error if the OS refuses to spawn the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_threads_are_clamped() {
        assert_eq!(RuntimeConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(
            RuntimeConfig::default().with_worker_threads(5000).worker_threads,
            MAX_WORKER_THREADS
        );
    }

    #[test]
    fn stack_size_is_clamped() {
        assert_eq!(RuntimeConfig::default().with_stack_size(100).stack_size, MIN_STACK_SIZE);
        assert_eq!(
            RuntimeConfig::default().with_stack_size(100 * 1024 * 1024).stack_size,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn blank_thread_name_falls_back() {
        let normalized = RuntimeConfig::default().with_thread_name("  ").normalized();
        assert_eq!(normalized.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn profiles_build_runnable_runtimes() {
        let runtime = build_runtime_with_config(&RuntimeConfig::memory_efficient().with_worker_threads(1))
            .expect("runtime should build");
        assert_eq!(runtime.block_on(async { 40 + 2 }), 42);
    }
}
