pub use crate::domain::config::ApiConfig;
pub use crate::domain::pack::PackMode;
pub use crate::item::{ItemError, ItemId};
pub use crate::session_key::SessionKey;

#[cfg(feature = "server")]
pub use crate::server::{ApiError, ApiJson, ApiQuery, ApiResult, ApiState, ClientAddr};
