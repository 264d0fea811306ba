//! The authenticate handshake: host code → relay token → host session.

use crate::{ExchangeError, ExchangeResult, TokenRelay};
use host_capability::{
    default_scopes, AccessToken, AuthorizeParams, HostCapability, SessionPayload,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Token and session produced by one successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub access_token: AccessToken,
    pub session: SessionPayload,
}

/// Runs the authorization-code handshake against a host and a relay.
#[derive(Clone)]
pub struct TokenExchangeClient {
    client_id: String,
    relay: Arc<dyn TokenRelay>,
}

impl TokenExchangeClient {
    pub fn new(client_id: impl Into<String>, relay: Arc<dyn TokenRelay>) -> Self {
        Self {
            client_id: client_id.into(),
            relay,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Authenticate with `scope`, or `["identify", "guilds"]` when `None`.
    ///
    /// Steps run strictly in order: wait for the host, request a code,
    /// exchange it at the relay, activate the session on the host. The code
    /// is moved into the exchange, so it cannot be reused; each call makes
    /// at most one exchange and one activation.
    pub async fn authenticate(
        &self,
        host: &dyn HostCapability,
        scope: Option<Vec<String>>,
    ) -> ExchangeResult<AuthenticatedSession> {
        let scope = scope.unwrap_or_else(default_scopes);

        host.ready().await?;

        let code = host
            .authorize(AuthorizeParams::code_flow(&self.client_id, scope))
            .await?;

        let access_token = self.relay.exchange(code).await?;
        debug!("access token received from relay");

        let session = host
            .authenticate(&access_token)
            .await?
            .ok_or(ExchangeError::AuthenticateFailed)?;

        info!(
            user_id = %session.user.id,
            scopes = ?session.scopes,
            "host session activated"
        );

        Ok(AuthenticatedSession {
            access_token,
            session,
        })
    }
}
