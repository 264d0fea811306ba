//! Token exchange error types.

use host_capability::HostError;
use thiserror::Error;

/// Message surfaced when the host returns no session.
pub const AUTHENTICATE_FAILED_MESSAGE: &str = "Authenticate command failed";

/// Errors raised during the code-for-token handshake.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// The relay answered with a non-success status
    #[error("Token relay returned {status} ({body_summary})")]
    RelayStatus { status: u16, body_summary: String },

    /// The relay could not be reached or its body could not be read
    #[error("Token relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered without an access token
    #[error("Token relay response did not contain an access token")]
    MissingToken,

    /// The relay base URL is unusable
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A host capability call failed
    #[error(transparent)]
    Host(#[from] HostError),

    /// The host returned no session for the token
    #[error("Authenticate command failed")]
    AuthenticateFailed,
}

impl ExchangeError {
    /// Whether the failure happened on the relay leg.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ExchangeError::RelayStatus { .. }
                | ExchangeError::Http(_)
                | ExchangeError::MissingToken
                | ExchangeError::InvalidUrl(_)
        )
    }
}

/// Result type alias using ExchangeError.
pub type ExchangeResult<T> = Result<T, ExchangeError>;
