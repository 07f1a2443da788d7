mod error;
mod handlers;
mod middleware;
mod responses;
mod server;

pub use error::{ApiError, ErrorBody, ErrorDetail, AUTHENTICATION_FAILED_MESSAGE};
pub use handlers::AppState;
pub use middleware::{ApiRateLimiter, RateLimitResult, RateLimiterStats};
pub use responses::*;
pub use server::ApiServer;
