//! Values exchanged with the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scopes requested when the caller does not name any.
pub const DEFAULT_SCOPES: [&str; 2] = ["identify", "guilds"];

/// The default scope list as owned strings.
pub fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

/// OAuth access token. Secret: `Debug` never prints the value and there is
/// no `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the one place that must send it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// Single-use authorization code issued by the host.
///
/// Not `Clone`: exchanging the code consumes it.
#[derive(PartialEq, Eq)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Consume the code, yielding the raw value for the exchange request.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode([redacted])")
    }
}

/// Parameters of the host `authorize` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeParams {
    pub client_id: String,
    pub response_type: String,
    pub state: String,
    pub prompt: String,
    pub scope: Vec<String>,
}

impl AuthorizeParams {
    /// Authorization-code request with no state and no consent prompt.
    pub fn code_flow(client_id: impl Into<String>, scope: Vec<String>) -> Self {
        Self {
            client_id: client_id.into(),
            response_type: "code".to_string(),
            state: String::new(),
            prompt: "none".to_string(),
            scope,
        }
    }
}

/// Response of the host `authorize` command.
#[derive(Deserialize)]
pub(crate) struct AuthorizeResponse {
    pub code: String,
}

/// Parameters of the host `authenticate` command.
#[derive(Serialize)]
pub(crate) struct AuthenticateParams<'a> {
    pub access_token: &'a str,
}

/// Signed-in user as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub public_flags: u64,
}

/// Application the session was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_origins: Option<Vec<String>>,
}

/// Session established by the host `authenticate` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub access_token: AccessToken,
    pub user: SessionUser,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub expires: String,
    pub application: ApplicationDescriptor,
}
