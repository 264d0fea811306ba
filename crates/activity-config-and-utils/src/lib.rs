//! Configuration, paths, errors and logging setup shared by the activity session crates.

mod config;
mod error;
mod logging;
mod paths;
mod redact;

pub use config::{
    Config, DEFAULT_CLIENT_ID, DEFAULT_LOG_LEVEL, DEFAULT_RELAY_BIND, DEFAULT_RELAY_URL,
    DEFAULT_TOKEN_ENDPOINT,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
pub use redact::summarize_response_body;
