//! Session status machine using rust-fsm.
//!
//! ```text
//! Pending ──Start──► Loading ──HostReady──► Ready
//!                       │
//!                       ├──BeginAuth──► Authenticating ──AuthSucceeded──► Ready
//!                       │                     │
//!                       └──Fail──► Error ◄────┘ Fail
//! ```
//!
//! Ready and Error are terminal: no input leaves them.

use rust_fsm::*;
use serde::{Deserialize, Serialize};
use std::fmt;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Pending)

    Pending => {
        Start => Loading
    },
    Loading => {
        HostReady => Ready,
        BeginAuth => Authenticating,
        Fail => Error
    },
    Authenticating => {
        AuthSucceeded => Ready,
        Fail => Error
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Session status as seen by consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Pending,
    Loading,
    Authenticating,
    Ready,
    Error,
}

impl SessionStatus {
    /// Ready or error; nothing follows.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Ready | SessionStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Loading => "loading",
            SessionStatus::Authenticating => "authenticating",
            SessionStatus::Ready => "ready",
            SessionStatus::Error => "error",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&SessionMachineState> for SessionStatus {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Pending => SessionStatus::Pending,
            SessionMachineState::Loading => SessionStatus::Loading,
            SessionMachineState::Authenticating => SessionStatus::Authenticating,
            SessionMachineState::Ready => SessionStatus::Ready,
            SessionMachineState::Error => SessionStatus::Error,
        }
    }
}
