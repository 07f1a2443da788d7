mod api;
mod logging;
mod rate_limit;
mod server;
mod types;

pub use api::ApiConfig;
pub use logging::LoggingConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{default_data_dir, ServerConfig, CONFIG_FILE_NAME};
pub use types::*;
