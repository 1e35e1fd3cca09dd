//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, validated identifiers, and (behind the
//! `server` feature) the API state, error mapping, and request extractors.
//!
//! ## Identifiers
//! ```rust
//! # use dtab_kernel::item::ItemId;
//! let id = ItemId::parse("minecraft:iron_ingot").unwrap();
//! assert_eq!(id.as_str(), "iron_ingot");
//! assert_eq!(id.qualified(), "minecraft:iron_ingot");
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use dtab_kernel::config::load_config;
//! let cfg: dtab_kernel::domain::config::ApiConfig = load_config(Some("server"))?;
//! ```
pub mod config;
pub mod item;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod session_key;

pub use dtab_domain as domain;
