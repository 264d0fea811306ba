//! Host capability shim for embedded activities.
//!
//! This crate provides:
//! - Launch-parameter parsing and embedded-mode detection
//! - The [`HostCapability`] surface (ready, authorize, authenticate, dispatch)
//! - [`HostSdk`], a tagged `{Real, Simulated}` host built once at startup
//! - Simulated identity resolution backed by session-scoped storage
//! - [`ChannelTransport`], an in-process command bridge to a real host

mod capability;
mod error;
mod identity;
mod launch;
mod real;
mod sdk;
mod simulated;
mod transport;
mod types;

pub use capability::HostCapability;
pub use error::{HostError, HostResult};
pub use identity::{random_identifier, SimulatedIdentity};
pub use launch::{LaunchParams, FRAME_ID_PARAM};
pub use real::RealHost;
pub use sdk::{CallCounts, HostMode, HostSdk};
pub use simulated::{SimulatedHost, SIMULATED_ACCESS_TOKEN, SIMULATED_CODE};
pub use transport::{
    channel_transport, ChannelTransport, Handshake, HostBridge, HostRequest, HostTransport,
    HANDSHAKE_COMMAND,
};
pub use types::{
    default_scopes, AccessToken, ApplicationDescriptor, AuthorizationCode, AuthorizeParams,
    SessionPayload, SessionUser, DEFAULT_SCOPES,
};
