//! Host variant backed by a live transport.

use crate::types::{AuthenticateParams, AuthorizeResponse};
use crate::{
    AccessToken, AuthorizationCode, AuthorizeParams, Handshake, HostCapability, HostError,
    HostResult, HostTransport, LaunchParams, SessionPayload,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Connection to the embedding host.
pub struct RealHost {
    handshake: Handshake,
    guild_id: Option<String>,
    channel_id: Option<String>,
    transport: Arc<dyn HostTransport>,
    handshake_done: OnceCell<()>,
}

impl RealHost {
    pub fn new(handshake: Handshake, launch: &LaunchParams, transport: Arc<dyn HostTransport>) -> Self {
        Self {
            handshake,
            guild_id: launch.guild_id().map(str::to_string),
            channel_id: launch.channel_id().map(str::to_string),
            transport,
            handshake_done: OnceCell::new(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.handshake.client_id
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.guild_id.as_deref()
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    async fn command<T: DeserializeOwned>(&self, command: &str, params: Value) -> HostResult<T> {
        let raw = self.transport.send(command, params).await?;
        serde_json::from_value(raw).map_err(|source| HostError::Response {
            command: command.to_string(),
            source,
        })
    }
}

#[async_trait]
impl HostCapability for RealHost {
    async fn ready(&self) -> HostResult<()> {
        // The handshake runs once; later callers see the cached outcome.
        self.handshake_done
            .get_or_try_init(|| async {
                self.transport.ready(&self.handshake).await?;
                info!(frame_id = ?self.handshake.frame_id, "host handshake complete");
                Ok::<(), HostError>(())
            })
            .await?;
        Ok(())
    }

    async fn authorize(&self, params: AuthorizeParams) -> HostResult<AuthorizationCode> {
        let params = serde_json::to_value(&params)?;
        let response: AuthorizeResponse = self.command("authorize", params).await?;
        debug!("authorization code received");
        Ok(AuthorizationCode::new(response.code))
    }

    async fn authenticate(&self, access_token: &AccessToken) -> HostResult<Option<SessionPayload>> {
        let params = serde_json::to_value(AuthenticateParams {
            access_token: access_token.expose(),
        })?;
        self.command("authenticate", params).await
    }

    async fn dispatch(&self, command: &str, params: Value) -> HostResult<Value> {
        self.transport.send(command, params).await
    }
}
