//! Session activation orchestrator.
//!
//! Runs readiness wait, optional authentication and the terminal publish
//! exactly once per orchestrator, however many setup signals arrive.

use crate::{
    SessionContext, SessionError, SessionMachine, SessionMachineInput, SessionStatus,
    SessionStore,
};
use host_capability::{HostCapability, HostSdk};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use token_exchange::TokenExchangeClient;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Inputs fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupOptions {
    /// Run the authorization handshake after the host is ready.
    pub authenticate: bool,
    /// Scopes to request; `None` means `["identify", "guilds"]`.
    pub scope: Option<Vec<String>>,
}

impl SetupOptions {
    pub fn ready_only() -> Self {
        Self::default()
    }

    pub fn authenticated(scope: Option<Vec<String>>) -> Self {
        Self {
            authenticate: true,
            scope,
        }
    }
}

pub struct SessionOrchestrator {
    host: Arc<HostSdk>,
    exchange: TokenExchangeClient,
    options: SetupOptions,
    started: AtomicBool,
    store: SessionStore,
}

impl SessionOrchestrator {
    pub fn new(host: Arc<HostSdk>, exchange: TokenExchangeClient, options: SetupOptions) -> Self {
        Self {
            host,
            exchange,
            options,
            started: AtomicBool::new(false),
            store: SessionStore::new(),
        }
    }

    pub fn host(&self) -> &Arc<HostSdk> {
        &self.host
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// A passive reader of this orchestrator's state.
    pub fn context(&self) -> SessionContext {
        SessionContext::new(self.host.clone(), self.store.subscribe())
    }

    /// Run setup once. Returns `true` for the call that performed the run
    /// and `false` for every later signal, which does nothing.
    ///
    /// Failures end in the error state; nothing is returned to the caller.
    pub async fn setup(&self) -> bool {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("setup already claimed; ignoring signal");
            return false;
        }

        self.run().await;
        true
    }

    /// Fire the setup signal on a tokio task.
    pub fn spawn_setup(self: &Arc<Self>) -> JoinHandle<bool> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.setup().await })
    }

    async fn run(&self) {
        let mut machine = SessionMachine::new();
        info!(
            mode = %self.host.mode(),
            authenticate = self.options.authenticate,
            "session setup started"
        );

        self.advance(&mut machine, SessionMachineInput::Start);

        if let Err(err) = self.host.ready().await {
            self.fail(&mut machine, err.into());
            return;
        }

        if !self.options.authenticate {
            self.advance(&mut machine, SessionMachineInput::HostReady);
            return;
        }

        self.advance(&mut machine, SessionMachineInput::BeginAuth);

        match self
            .exchange
            .authenticate(self.host.as_ref(), self.options.scope.clone())
            .await
        {
            Ok(authenticated) => {
                if self.consume(&mut machine, SessionMachineInput::AuthSucceeded) {
                    self.store
                        .commit_authenticated(authenticated.access_token, authenticated.session);
                    info!(status = %SessionStatus::Ready, "session authenticated");
                }
            }
            Err(err) => self.fail(&mut machine, err.into()),
        }
    }

    fn consume(&self, machine: &mut SessionMachine, input: SessionMachineInput) -> bool {
        let from = SessionStatus::from(machine.state());
        match machine.consume(&input) {
            Ok(_) => true,
            Err(_) => {
                error!(from = %from, input = ?input, "invalid session transition ignored");
                false
            }
        }
    }

    fn advance(&self, machine: &mut SessionMachine, input: SessionMachineInput) {
        if self.consume(machine, input) {
            let status = SessionStatus::from(machine.state());
            self.store.set_status(status);
            debug!(status = %status, "session status changed");
        }
    }

    fn fail(&self, machine: &mut SessionMachine, err: SessionError) {
        let message = err.message();
        warn!(error = %message, "session setup failed");
        if self.consume(machine, SessionMachineInput::Fail) {
            self.store.fail(message);
        }
    }
}
