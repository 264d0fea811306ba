//! Context distribution: a read-only view over the session store.

use crate::{SessionState, SessionStatus};
use host_capability::{AccessToken, HostSdk, SessionPayload};
use std::sync::Arc;
use tokio::sync::watch;

/// What a consumer sees at one point in time.
#[derive(Debug, Clone)]
pub struct ContextSnapshot {
    pub access_token: Option<AccessToken>,
    pub authenticated: bool,
    pub host: Arc<HostSdk>,
    pub error: Option<String>,
    pub session: Option<SessionPayload>,
    pub status: SessionStatus,
}

/// Passive subscriber to an orchestrator's state.
///
/// Reading never starts or repeats the setup run. Clones share the host
/// handle but track changes independently.
#[derive(Debug, Clone)]
pub struct SessionContext {
    host: Arc<HostSdk>,
    rx: watch::Receiver<SessionState>,
}

impl SessionContext {
    pub(crate) fn new(host: Arc<HostSdk>, rx: watch::Receiver<SessionState>) -> Self {
        Self { host, rx }
    }

    pub fn host(&self) -> &Arc<HostSdk> {
        &self.host
    }

    pub fn status(&self) -> SessionStatus {
        self.rx.borrow().status
    }

    /// The latest published state.
    pub fn snapshot(&self) -> ContextSnapshot {
        self.build(&self.rx.borrow())
    }

    /// Wait for the next publish. `None` once the orchestrator is gone.
    pub async fn changed(&mut self) -> Option<ContextSnapshot> {
        self.rx.changed().await.ok()?;
        let state = self.rx.borrow_and_update().clone();
        Some(self.build(&state))
    }

    /// Wait until the status is ready or error.
    ///
    /// If the orchestrator is dropped first, the last published state is
    /// returned as is.
    pub async fn wait_terminal(&mut self) -> ContextSnapshot {
        let waited = self
            .rx
            .wait_for(|state| state.status.is_terminal())
            .await
            .map(|state| state.clone());
        let state = match waited {
            Ok(state) => state,
            Err(_) => self.rx.borrow().clone(),
        };
        self.build(&state)
    }

    /// The snapshot, only once the status is terminal.
    pub fn gate(&self) -> Option<ContextSnapshot> {
        let snapshot = self.snapshot();
        snapshot.status.is_terminal().then_some(snapshot)
    }

    /// Render with the snapshot when terminal, otherwise return `placeholder`.
    pub fn render_or<T>(&self, placeholder: T, render: impl FnOnce(&ContextSnapshot) -> T) -> T {
        match self.gate() {
            Some(snapshot) => render(&snapshot),
            None => placeholder,
        }
    }

    fn build(&self, state: &SessionState) -> ContextSnapshot {
        ContextSnapshot {
            access_token: state.access_token.clone(),
            authenticated: state.authenticated(),
            host: self.host.clone(),
            error: state.error.clone(),
            session: state.session.clone(),
            status: state.status,
        }
    }
}
