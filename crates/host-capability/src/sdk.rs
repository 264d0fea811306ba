//! Dual-mode host handle.

use crate::{
    AccessToken, AuthorizationCode, AuthorizeParams, Handshake, HostCapability, HostResult,
    HostTransport, LaunchParams, RealHost, SessionPayload, SimulatedHost, SimulatedIdentity,
};
use activity_storage::SessionStorage;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Which variant a [`HostSdk`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    Real,
    Simulated,
}

impl fmt::Display for HostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostMode::Real => f.write_str("real"),
            HostMode::Simulated => f.write_str("simulated"),
        }
    }
}

/// Number of calls made per capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub ready: usize,
    pub authorize: usize,
    pub authenticate: usize,
    pub dispatch: usize,
}

#[derive(Debug, Default)]
struct Counters {
    ready: AtomicUsize,
    authorize: AtomicUsize,
    authenticate: AtomicUsize,
    dispatch: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CallCounts {
        CallCounts {
            ready: self.ready.load(Ordering::Relaxed),
            authorize: self.authorize.load(Ordering::Relaxed),
            authenticate: self.authenticate.load(Ordering::Relaxed),
            dispatch: self.dispatch.load(Ordering::Relaxed),
        }
    }
}

enum Variant {
    Real(RealHost),
    Simulated(SimulatedHost),
}

/// The host, real or simulated, behind one capability interface.
///
/// Build it once at startup and share it (`Arc<HostSdk>`).
pub struct HostSdk {
    variant: Variant,
    counters: Counters,
}

impl HostSdk {
    pub fn real(host: RealHost) -> Self {
        Self {
            variant: Variant::Real(host),
            counters: Counters::default(),
        }
    }

    pub fn simulated(host: SimulatedHost) -> Self {
        Self {
            variant: Variant::Simulated(host),
            counters: Counters::default(),
        }
    }

    /// Pick the variant from the launch parameters.
    ///
    /// Embedded launches (a `frame_id` is present) open a transport through
    /// `connect`; anything else resolves a simulated identity against
    /// `storage` and never calls `connect`.
    pub fn detect<F>(
        client_id: &str,
        launch: &LaunchParams,
        storage: &dyn SessionStorage,
        connect: F,
    ) -> HostResult<Self>
    where
        F: FnOnce(&Handshake) -> HostResult<Arc<dyn HostTransport>>,
    {
        if launch.is_embedded() {
            let handshake = Handshake {
                client_id: client_id.to_string(),
                frame_id: launch.frame_id().map(str::to_string),
                instance_id: launch.instance_id().map(str::to_string),
                platform: launch.platform().map(str::to_string),
            };
            let transport = connect(&handshake)?;
            info!(mode = %HostMode::Real, "host connection created");
            return Ok(Self::real(RealHost::new(handshake, launch, transport)));
        }

        let identity = SimulatedIdentity::resolve(launch, storage)?;
        info!(
            mode = %HostMode::Simulated,
            guild_id = %identity.guild_id,
            channel_id = %identity.channel_id,
            "simulated host created"
        );
        Ok(Self::simulated(SimulatedHost::new(client_id, identity)))
    }

    pub fn mode(&self) -> HostMode {
        match &self.variant {
            Variant::Real(_) => HostMode::Real,
            Variant::Simulated(_) => HostMode::Simulated,
        }
    }

    pub fn client_id(&self) -> &str {
        match &self.variant {
            Variant::Real(host) => host.client_id(),
            Variant::Simulated(host) => host.client_id(),
        }
    }

    /// Guild the activity runs in, if any (absent in direct messages).
    pub fn guild_id(&self) -> Option<&str> {
        match &self.variant {
            Variant::Real(host) => host.guild_id(),
            Variant::Simulated(host) => Some(host.identity().guild_id.as_str()),
        }
    }

    pub fn channel_id(&self) -> Option<&str> {
        match &self.variant {
            Variant::Real(host) => host.channel_id(),
            Variant::Simulated(host) => Some(host.identity().channel_id.as_str()),
        }
    }

    /// Calls made so far, per capability.
    pub fn call_counts(&self) -> CallCounts {
        self.counters.snapshot()
    }

    fn capability(&self) -> &dyn HostCapability {
        match &self.variant {
            Variant::Real(host) => host,
            Variant::Simulated(host) => host,
        }
    }
}

impl fmt::Debug for HostSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSdk")
            .field("mode", &self.mode())
            .field("client_id", &self.client_id())
            .field("calls", &self.call_counts())
            .finish()
    }
}

#[async_trait]
impl HostCapability for HostSdk {
    async fn ready(&self) -> HostResult<()> {
        Counters::bump(&self.counters.ready);
        self.capability().ready().await
    }

    async fn authorize(&self, params: AuthorizeParams) -> HostResult<AuthorizationCode> {
        Counters::bump(&self.counters.authorize);
        debug!(mode = %self.mode(), scopes = ?params.scope, "requesting authorization code");
        self.capability().authorize(params).await
    }

    async fn authenticate(&self, access_token: &AccessToken) -> HostResult<Option<SessionPayload>> {
        Counters::bump(&self.counters.authenticate);
        debug!(mode = %self.mode(), "activating session");
        self.capability().authenticate(access_token).await
    }

    async fn dispatch(&self, command: &str, params: Value) -> HostResult<Value> {
        Counters::bump(&self.counters.dispatch);
        self.capability().dispatch(command, params).await
    }
}
