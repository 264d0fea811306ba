//! Authorization-code handshake between an embedded activity, its host and
//! the token relay.
//!
//! - [`TokenRelay`] / [`HttpTokenRelay`]: code-for-token exchange over HTTP
//! - [`TokenExchangeClient`]: ready → authorize → exchange → authenticate

mod error;
mod exchange;
mod relay_client;

pub use error::{ExchangeError, ExchangeResult, AUTHENTICATE_FAILED_MESSAGE};
pub use exchange::{AuthenticatedSession, TokenExchangeClient};
pub use relay_client::{HttpTokenRelay, TokenRelay, TOKEN_PATH};
