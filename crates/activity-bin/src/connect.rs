//! `connect`: build the host, run setup once and summarize the context.

use std::sync::Arc;

use activity_config_and_utils::{Config, Paths};
use activity_storage::FileSessionStorage;
use host_capability::{HostError, HostSdk, LaunchParams};
use serde_json::{json, Value};
use session_orchestrator::{ContextSnapshot, SessionOrchestrator, SetupOptions};
use token_exchange::{HttpTokenRelay, TokenExchangeClient};
use tracing::info;

pub struct ConnectOptions {
    pub query: String,
    pub scope_id: String,
    pub authenticate: bool,
    pub scopes: Option<Vec<String>>,
    pub end_scope: bool,
}

pub async fn run(
    config: &Config,
    paths: &Paths,
    options: ConnectOptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let launch = LaunchParams::parse(&options.query);
    let storage = FileSessionStorage::open(paths, &options.scope_id);

    // No host transport exists for a terminal process.
    let host = HostSdk::detect(&config.client_id, &launch, &storage, |_| {
        Err(HostError::TransportUnavailable(
            "no host transport is available from the command line".to_string(),
        ))
    })?;

    let relay = HttpTokenRelay::new(config.relay_url()?.as_str())?;
    let exchange = TokenExchangeClient::new(config.client_id.clone(), Arc::new(relay));
    let setup = SetupOptions {
        authenticate: options.authenticate,
        scope: options.scopes,
    };

    let orchestrator = SessionOrchestrator::new(Arc::new(host), exchange, setup);
    let mut context = orchestrator.context();
    orchestrator.setup().await;
    let snapshot = context.wait_terminal().await;
    info!(status = %snapshot.status, scope_id = %options.scope_id, "session setup finished");

    if options.end_scope {
        storage.end_scope()?;
    }

    Ok(summarize(&snapshot, &options.scope_id))
}

/// Printable view of a snapshot. The token itself is never included.
fn summarize(snapshot: &ContextSnapshot, scope_id: &str) -> Value {
    json!({
        "status": snapshot.status,
        "authenticated": snapshot.authenticated,
        "error": snapshot.error,
        "mode": snapshot.host.mode().to_string(),
        "guild_id": snapshot.host.guild_id(),
        "channel_id": snapshot.host.channel_id(),
        "scope_id": scope_id,
        "user": snapshot.session.as_ref().map(|session| &session.user),
        "scopes": snapshot.session.as_ref().map(|session| &session.scopes),
        "expires": snapshot.session.as_ref().map(|session| &session.expires),
    })
}
