//! HTTP plumbing shared by the feature routers.

pub mod error;
pub mod extract;
mod health;
pub mod rate_limit;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiErrorExt, ApiResult, ErrorDetail, ErrorResponse};
pub use extract::{ApiJson, ApiQuery, ClientAddr};
pub use rate_limit::RateLimiter;
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
