//! Logging initialization.
//!
//! Thin wrapper over the observability crate so every binary sets up
//! tracing the same way: JSONL to `<base>/logs/dev.jsonl`, plus stderr.

use crate::Paths;
use observability::{LogConfig, ObservabilityMode};

/// Initialize logging for one service.
///
/// `ACTIVITY_OBS_MODE=prod` switches to metadata-only fields. `RUST_LOG`
/// still wins over `level` when set.
///
/// ```ignore
/// init_logging("relay", "info", &paths);
/// tracing::info!("relay started");
/// ```
pub fn init_logging(service_name: &str, level: &str, paths: &Paths) {
    let mode = match std::env::var("ACTIVITY_OBS_MODE")
        .unwrap_or_else(|_| "dev".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "prod" | "production" => ObservabilityMode::ProdMetadataOnly,
        _ => ObservabilityMode::DevVerbose,
    };

    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: parse_level(level).to_string().to_lowercase(),
        log_path: Some(paths.dev_log_file()),
        also_stderr: true,
        mode,
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
