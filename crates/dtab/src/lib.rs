//! Facade crate for the Duplicating Table generator.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `dtab` with the `server` feature.
//! - Call `dtab::init` to build every feature slice, then mount `dtab::server::router::api_router`.

pub use dtab_domain as domain;
pub use dtab_kernel as kernel;

#[cfg(feature = "server")]
use dtab_domain::config::ApiConfig;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        use dtab_kernel::server::ApiState;
        pub use dtab_kernel::server::router::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// System routes plus every feature slice's routes.
        pub fn api_router() -> OpenApiRouter<ApiState> {
            OpenApiRouter::new()
                .merge(system_router())
                .merge(crate::features::sessions::server::router())
                .merge(crate::features::catalog::server::router())
                .merge(crate::features::packaging::server::router())
        }
    }
}

/// Feature slices.
pub mod features {
    pub use dtab_catalog as catalog;
    pub use dtab_packaging as packaging;
    pub use dtab_recipes as recipes;
    pub use dtab_sessions as sessions;
}

/// Initialize all feature slices for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    config: &ApiConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let slices = vec![
        features::sessions::init(&config.sessions)?,
        features::catalog::init()?,
        features::recipes::init(&config.generator)?,
        features::packaging::init(config)?,
    ];

    tracing::debug!(count = slices.len(), "Feature slices initialized");
    Ok(slices)
}

