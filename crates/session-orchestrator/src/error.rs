//! Failures surfaced by a setup run.

use host_capability::HostError;
use thiserror::Error;
use token_exchange::{ExchangeError, AUTHENTICATE_FAILED_MESSAGE};
use tracing::warn;

/// Message stored when the relay leg fails; details only go to the log.
pub const TOKEN_EXCHANGE_FAILED_MESSAGE: &str = "Token exchange failed";

/// Message stored when a failure carries no description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Why a setup run ended in the error state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The relay or the provider could not produce a token
    #[error("Token exchange failed")]
    Transport,

    /// The host returned no session for the token
    #[error("Authenticate command failed")]
    Authentication,

    /// Anything else
    #[error("{}", .0.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
    Unknown(Option<String>),
}

impl SessionError {
    /// Build an `Unknown` from a description, dropping blank ones.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            SessionError::Unknown(None)
        } else {
            SessionError::Unknown(Some(message))
        }
    }

    /// The string committed to the store.
    pub fn message(&self) -> String {
        match self {
            SessionError::Authentication => AUTHENTICATE_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ExchangeError> for SessionError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::AuthenticateFailed => SessionError::Authentication,
            ExchangeError::Host(host) => host.into(),
            other if other.is_transport() => {
                warn!(error = %other, "token relay leg failed");
                SessionError::Transport
            }
            other => SessionError::unknown(other.to_string()),
        }
    }
}

impl From<HostError> for SessionError {
    fn from(err: HostError) -> Self {
        SessionError::unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_message() {
        let err: SessionError = ExchangeError::AuthenticateFailed.into();
        assert_eq!(err, SessionError::Authentication);
        assert_eq!(err.message(), "Authenticate command failed");
    }

    #[test]
    fn test_transport_message_is_generic() {
        let err: SessionError = ExchangeError::MissingToken.into();
        assert_eq!(err, SessionError::Transport);
        assert_eq!(err.message(), TOKEN_EXCHANGE_FAILED_MESSAGE);

        let status: SessionError = ExchangeError::RelayStatus {
            status: 502,
            body_summary: "len=42 sha256=abc".into(),
        }
        .into();
        assert_eq!(status.message(), "Token exchange failed");

        let url: SessionError = ExchangeError::InvalidUrl(url::ParseError::EmptyHost).into();
        assert_eq!(url.message(), TOKEN_EXCHANGE_FAILED_MESSAGE);
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(SessionError::unknown("").message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(SessionError::Unknown(None).message(), "An unknown error occurred");
        assert_eq!(SessionError::unknown("boom").message(), "boom");
    }

    #[test]
    fn test_host_errors_are_unknown() {
        let err: SessionError = HostError::Disconnected.into();
        assert!(matches!(err, SessionError::Unknown(Some(_))));

        let wrapped: SessionError = ExchangeError::Host(HostError::Disconnected).into();
        assert_eq!(wrapped, err);
    }
}
