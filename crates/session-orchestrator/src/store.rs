//! Session value store: the single source of session state.
//!
//! One writer (the orchestrator) publishes through a `watch` channel; any
//! number of readers observe the latest value. Token and session are
//! committed in the same publish as the `ready` status.

use crate::SessionStatus;
use host_capability::{AccessToken, SessionPayload};
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

/// Latest published session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub access_token: Option<AccessToken>,
    pub session: Option<SessionPayload>,
    pub error: Option<String>,
}

impl SessionState {
    /// A token is present.
    pub fn authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Write side of the store.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
    history: Mutex<Vec<SessionStatus>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let initial = SessionState::default();
        let history = vec![initial.status];
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            history: Mutex::new(history),
        }
    }

    /// A reader positioned at the current value.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Every status published so far, in order, starting with `pending`.
    pub fn history(&self) -> Vec<SessionStatus> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_status(&self, status: SessionStatus) {
        self.publish(|state| state.status = status);
    }

    /// Publish `ready` together with the token and the session.
    pub(crate) fn commit_authenticated(&self, access_token: AccessToken, session: SessionPayload) {
        self.publish(|state| {
            state.status = SessionStatus::Ready;
            state.access_token = Some(access_token);
            state.session = Some(session);
        });
    }

    /// Publish `error` with `message`. Token and session stay absent.
    pub(crate) fn fail(&self, message: String) {
        self.publish(|state| {
            state.status = SessionStatus::Error;
            state.error = Some(message);
        });
    }

    fn publish(&self, modify: impl FnOnce(&mut SessionState)) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        self.tx.send_modify(|state| {
            modify(state);
            history.push(state.status);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_capability::{SimulatedHost, SimulatedIdentity};

    fn payload() -> SessionPayload {
        SimulatedHost::new(
            "123",
            SimulatedIdentity {
                user_id: "u".into(),
                guild_id: "g".into(),
                channel_id: "c".into(),
            },
        )
        .session_payload()
    }

    #[test]
    fn test_initial_state() {
        let store = SessionStore::new();
        let state = store.current();
        assert_eq!(state.status, SessionStatus::Pending);
        assert!(state.access_token.is_none());
        assert!(state.session.is_none());
        assert!(state.error.is_none());
        assert!(!state.authenticated());
        assert_eq!(store.history(), vec![SessionStatus::Pending]);
    }

    #[test]
    fn test_commit_is_single_publish() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.commit_authenticated(AccessToken::new("tok"), payload());

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.status, SessionStatus::Ready);
        assert_eq!(state.access_token, Some(AccessToken::new("tok")));
        assert_eq!(state.session, Some(payload()));
        assert!(state.authenticated());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_fail_keeps_token_absent() {
        let store = SessionStore::new();
        store.set_status(SessionStatus::Loading);
        store.fail("boom".to_string());

        let state = store.current();
        assert_eq!(state.status, SessionStatus::Error);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(state.access_token.is_none());
        assert_eq!(
            store.history(),
            vec![
                SessionStatus::Pending,
                SessionStatus::Loading,
                SessionStatus::Error
            ]
        );
    }

    #[test]
    fn test_publish_without_readers() {
        let store = SessionStore::new();
        store.set_status(SessionStatus::Loading);
        assert_eq!(store.current().status, SessionStatus::Loading);
    }
}
