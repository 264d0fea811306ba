//! Host capability error types.

use activity_storage::StorageError;
use thiserror::Error;

/// Errors raised while talking to the embedding host.
#[derive(Error, Debug)]
pub enum HostError {
    /// The activity was launched embedded but no transport could be opened
    #[error("Host transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The far end of the transport went away
    #[error("Host disconnected")]
    Disconnected,

    /// The host answered a command with an error
    #[error("Host command '{command}' failed: {message}")]
    Command { command: String, message: String },

    /// The host answered with a payload of the wrong shape
    #[error("Unexpected host response for '{command}': {source}")]
    Response {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session-scoped storage failed while resolving the simulated identity
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias using HostError.
pub type HostResult<T> = Result<T, HostError>;
