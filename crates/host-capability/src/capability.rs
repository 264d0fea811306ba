//! The capability surface every host variant exposes.

use crate::{AccessToken, AuthorizationCode, AuthorizeParams, HostResult, SessionPayload};
use async_trait::async_trait;
use serde_json::Value;

/// Operations the activity may invoke on its host.
#[async_trait]
pub trait HostCapability: Send + Sync {
    /// Wait until the host is ready to accept commands.
    async fn ready(&self) -> HostResult<()>;

    /// Ask the host for a single-use authorization code.
    async fn authorize(&self, params: AuthorizeParams) -> HostResult<AuthorizationCode>;

    /// Activate a signed-in session with an access token.
    ///
    /// `Ok(None)` means the host returned no session.
    async fn authenticate(&self, access_token: &AccessToken) -> HostResult<Option<SessionPayload>>;

    /// Any other host command (e.g. `get_channel`).
    async fn dispatch(&self, command: &str, params: Value) -> HostResult<Value>;
}
