//! Stateless token relay.
//!
//! Accepts `POST /api/token` with `{code}`, forwards the code and the client
//! credentials to the identity provider and answers `{access_token}`.

mod error;
mod provider;
mod server;

pub use error::{RelayError, RelayResult};
pub use provider::{ProviderClient, RelaySecrets, CLIENT_ID_ENV, CLIENT_SECRET_ENV, GRANT_TYPE};
pub use server::{router, run, serve, TokenRequest, TokenResponse, HEALTH_ROUTE, TOKEN_ROUTE};
