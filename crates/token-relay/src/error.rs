//! Relay error types.

use activity_config_and_utils::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors raised while serving or forwarding a token request.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A required secret is not set in the environment
    #[error("Missing secret: {0} is not set")]
    MissingSecret(&'static str),

    /// The provider answered with a non-success status
    #[error("Identity provider returned {status} ({body_summary})")]
    Provider { status: u16, body_summary: String },

    /// The provider could not be reached or its body could not be read
    #[error("Identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered without an access token
    #[error("Identity provider response did not contain an access token")]
    MissingToken,

    /// The listen address is unusable
    #[error("Invalid bind address: {0}")]
    InvalidBind(#[from] std::net::AddrParseError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] CoreError),

    /// IO error while binding or serving
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Status returned to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Provider { .. } | Self::Http(_) | Self::MissingToken => StatusCode::BAD_GATEWAY,
            Self::MissingSecret(_) | Self::InvalidBind(_) | Self::Config(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Provider bodies and local details stay in the logs.
        let message = match &self {
            Self::Provider { .. } | Self::Http(_) => "token exchange failed",
            Self::MissingToken => "token exchange returned no access token",
            _ => "internal error",
        };
        (self.status_code(), Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias using RelayError.
pub type RelayResult<T> = Result<T, RelayError>;
