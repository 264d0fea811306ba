//! Session activation for embedded activities.
//!
//! - [`SessionOrchestrator`]: one-shot setup run (ready → authenticate → terminal)
//! - [`SessionStore`]: single-writer state published over a `watch` channel
//! - [`SessionContext`]: passive reader with change notification and a
//!   terminal-state gate
//! - [`SessionStatus`]: consumer view of the rust-fsm status machine

mod context;
mod error;
mod orchestrator;
mod status;
mod store;

pub use context::{ContextSnapshot, SessionContext};
pub use error::{SessionError, TOKEN_EXCHANGE_FAILED_MESSAGE, UNKNOWN_ERROR_MESSAGE};
pub use orchestrator::{SessionOrchestrator, SetupOptions};
pub use status::{
    session_machine, SessionMachine, SessionMachineInput, SessionMachineState, SessionStatus,
};
pub use store::{SessionState, SessionStore};
