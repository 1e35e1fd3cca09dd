//! Sessions feature slice: the last saved item list and selection per session key.
mod error;
mod session;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

pub use error::{SessionError, SessionErrorExt};
pub use session::Session;
pub use store::SessionStore;

#[cfg(feature = "server")]
use dtab_kernel::domain::config::SessionsConfig;
#[cfg(feature = "server")]
use dtab_kernel::domain::registry::InitializedSlice;

/// Sessions feature state.
#[dtab_derive::dtab_slice]
pub struct Sessions {
    pub store: SessionStore,
}

/// Initialize the sessions feature.
///
/// # Errors
/// Returns an error if the file backend cannot create its directory.
#[cfg(feature = "server")]
pub fn init(config: &SessionsConfig) -> Result<InitializedSlice, SessionError> {
    let store = SessionStore::from_config(config)?;
    tracing::info!(backend = ?config.backend, "Sessions slice initialized");

    Ok(Sessions::new(SessionsInner { store }).into())
}
