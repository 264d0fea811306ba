//! Host variant used when the activity runs outside the host.
//!
//! Every capability is answered locally. `authenticate` is a pure function
//! of the simulated identity and never touches the network.

use crate::{
    AccessToken, ApplicationDescriptor, AuthorizationCode, AuthorizeParams, HostCapability,
    HostResult, SessionPayload, SessionUser, SimulatedIdentity,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tracing::debug;

/// Code returned by the simulated `authorize`.
pub const SIMULATED_CODE: &str = "mock_code";

/// Token carried in the simulated session payload.
pub const SIMULATED_ACCESS_TOKEN: &str = "mock_token";

/// Fabricates host responses for a [`SimulatedIdentity`].
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    client_id: String,
    identity: SimulatedIdentity,
}

impl SimulatedHost {
    pub fn new(client_id: impl Into<String>, identity: SimulatedIdentity) -> Self {
        Self {
            client_id: client_id.into(),
            identity,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn identity(&self) -> &SimulatedIdentity {
        &self.identity
    }

    /// The session the simulated host signs in with.
    pub fn session_payload(&self) -> SessionPayload {
        SessionPayload {
            access_token: AccessToken::new(SIMULATED_ACCESS_TOKEN),
            user: SessionUser {
                id: self.identity.user_id.clone(),
                username: self.identity.user_id.clone(),
                discriminator: self.identity.discriminator(),
                avatar: None,
                public_flags: 1,
            },
            scopes: Vec::new(),
            expires: simulated_expiry(),
            application: ApplicationDescriptor {
                id: "mock_app_id".to_string(),
                name: "mock_app_name".to_string(),
                icon: Some("mock_app_icon".to_string()),
                description: "mock_app_description".to_string(),
                rpc_origins: None,
            },
        }
    }

    fn channel(&self) -> Value {
        json!({
            "id": self.identity.channel_id,
            "guild_id": self.identity.guild_id,
            "name": "mock-channel",
            "type": 0,
        })
    }
}

/// Fixed far-future expiry, 2112-02-01T00:00:00Z.
fn simulated_expiry() -> String {
    Utc.with_ymd_and_hms(2112, 2, 1, 0, 0, 0)
        .single()
        .map(|at| at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_default()
}

#[async_trait]
impl HostCapability for SimulatedHost {
    async fn ready(&self) -> HostResult<()> {
        Ok(())
    }

    async fn authorize(&self, params: AuthorizeParams) -> HostResult<AuthorizationCode> {
        debug!(scopes = ?params.scope, "simulated authorize");
        Ok(AuthorizationCode::new(SIMULATED_CODE))
    }

    async fn authenticate(&self, _access_token: &AccessToken) -> HostResult<Option<SessionPayload>> {
        Ok(Some(self.session_payload()))
    }

    async fn dispatch(&self, command: &str, _params: Value) -> HostResult<Value> {
        debug!(command, "simulated command");
        match command {
            "get_channel" => Ok(self.channel()),
            _ => Ok(Value::Null),
        }
    }
}
