//! Transport to a real embedding host.
//!
//! The wire protocol belongs to the host and is not modelled here. A
//! transport only needs to complete the handshake and carry named commands
//! with JSON parameters and results.

use crate::{HostError, HostResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Values announced to the host when connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handshake {
    pub client_id: String,
    pub frame_id: Option<String>,
    pub instance_id: Option<String>,
    pub platform: Option<String>,
}

/// A live connection to the embedding host.
///
/// Calls may suspend for as long as the host takes to answer; no timeout is
/// applied at this layer.
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Complete the handshake. Resolves once the host accepts commands.
    async fn ready(&self, handshake: &Handshake) -> HostResult<()>;

    /// Send one command and wait for its result.
    async fn send(&self, command: &str, params: Value) -> HostResult<Value>;
}

/// Command name used for the handshake frame on a [`ChannelTransport`].
pub const HANDSHAKE_COMMAND: &str = "ready";

/// One command waiting for the host's answer.
#[derive(Debug)]
pub struct HostRequest {
    pub command: String,
    pub params: Value,
    reply: oneshot::Sender<Result<Value, String>>,
}

impl HostRequest {
    /// Answer the command. An `Err` message surfaces as a command failure.
    pub fn respond(self, result: Result<Value, String>) {
        // The caller may have given up; nothing to do then.
        let _ = self.reply.send(result);
    }
}

/// In-process transport: commands go out over a channel and the embedder
/// answers them through the paired [`HostBridge`].
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::Sender<HostRequest>,
}

/// Host side of a [`ChannelTransport`].
#[derive(Debug)]
pub struct HostBridge {
    rx: mpsc::Receiver<HostRequest>,
}

impl HostBridge {
    /// Next pending command, or `None` once every transport clone is dropped.
    pub async fn next_request(&mut self) -> Option<HostRequest> {
        self.rx.recv().await
    }
}

/// Create a connected transport/bridge pair.
pub fn channel_transport(buffer: usize) -> (ChannelTransport, HostBridge) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (ChannelTransport { tx }, HostBridge { rx })
}

impl ChannelTransport {
    async fn roundtrip(&self, command: &str, params: Value) -> HostResult<Value> {
        let (reply, response) = oneshot::channel();
        let request = HostRequest {
            command: command.to_string(),
            params,
            reply,
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| HostError::Disconnected)?;
        debug!(command, "host command sent");

        response
            .await
            .map_err(|_| HostError::Disconnected)?
            .map_err(|message| HostError::Command {
                command: command.to_string(),
                message,
            })
    }
}

#[async_trait]
impl HostTransport for ChannelTransport {
    async fn ready(&self, handshake: &Handshake) -> HostResult<()> {
        let params = serde_json::to_value(handshake)?;
        self.roundtrip(HANDSHAKE_COMMAND, params).await?;
        Ok(())
    }

    async fn send(&self, command: &str, params: Value) -> HostResult<Value> {
        self.roundtrip(command, params).await
    }
}
