// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket transport client: connect, register, heartbeat, reconnect.
//!
//! [`run`] spawns the connection-owning background task and hands back a
//! cloneable [`WsTransport`] (for `Effect::SendTransportMessage` to send
//! through) plus a [`TransportHandle`] whose `inbound` channel is the only
//! way frames from the server reach the pipeline domain — mirroring the
//! daemon's `EventBus`/`EventReader` split (one owner writes, one reader
//! drains).

use crate::backoff::ReconnectBackoff;
use crate::frame::{inbound_kind, InboundFrame};
use crate::session::{SessionState, SessionStatus};
use crate::signing::SigningKey;
use crate::Transport;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport not connected")]
    NotConnected,
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("session invalid: {0:?}")]
    SessionInvalid(SessionStatus),
}

/// Identity sent in the `register` frame (§4.11, §6).
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub tenant_id: String,
    pub hostname: String,
    pub agent_version: String,
}

/// Default heartbeat interval; the server's `welcome` message may override
/// it (§4.11).
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);

struct Shared {
    outbound_tx: Mutex<Option<mpsc::UnboundedSender<Value>>>,
    session: Mutex<SessionState>,
}

/// Cloneable send-side handle. This is what `Effect::SendTransportMessage`
/// is executed against.
#[derive(Clone)]
pub struct WsTransport {
    shared: Arc<Shared>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&self, frame: Value) -> Result<(), TransportError> {
        let status = {
            let session = self.shared.session.lock();
            match &*session {
                SessionState::Invalid(reason) => Some(Err(TransportError::SessionInvalid(*reason))),
                _ => None,
            }
        };
        if let Some(err) = status {
            return err;
        }
        let tx = self.shared.outbound_tx.lock().clone();
        match tx {
            Some(tx) => tx
                .send(frame)
                .map_err(|e| TransportError::SendFailed(e.to_string())),
            None => Err(TransportError::NotConnected),
        }
    }

    fn is_connected(&self) -> bool {
        self.shared.session.lock().is_connected()
    }
}

/// Owns the background connection task; `inbound` is drained by the
/// daemon's main loop and fed into the pipeline domain.
pub struct TransportHandle {
    pub inbound: mpsc::UnboundedReceiver<InboundFrame>,
    join: tokio::task::JoinHandle<()>,
}

impl TransportHandle {
    pub fn abort(&self) {
        self.join.abort();
    }
}

/// Start the connection loop against `url`, registering as `identity`.
/// Reconnects with [`ReconnectBackoff`] until the session becomes
/// permanently invalid (§4.11) or the handle is dropped/aborted.
pub fn run(
    url: String,
    identity: DeviceIdentity,
    signing_key: SigningKey,
) -> (WsTransport, TransportHandle) {
    let shared = Arc::new(Shared {
        outbound_tx: Mutex::new(None),
        session: Mutex::new(SessionState::Disconnected),
    });
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    let task_shared = Arc::clone(&shared);
    let join = tokio::spawn(async move {
        connection_loop(url, identity, signing_key, task_shared, inbound_tx).await;
    });

    (
        WsTransport {
            shared: Arc::clone(&shared),
        },
        TransportHandle {
            inbound: inbound_rx,
            join,
        },
    )
}

async fn connection_loop(
    url: String,
    identity: DeviceIdentity,
    signing_key: SigningKey,
    shared: Arc<Shared>,
    inbound_tx: mpsc::UnboundedSender<InboundFrame>,
) {
    let mut backoff = ReconnectBackoff::new();

    loop {
        match connect_and_serve(&url, &identity, &signing_key, &shared, &inbound_tx).await {
            Ok(()) => {
                // Clean close from the server side; still subject to reconnect
                // unless the session was marked invalid in the process.
            }
            Err(e) => {
                tracing::warn!(error = %e, "transport connection lost");
            }
        }

        *shared.outbound_tx.lock() = None;
        if shared.session.lock().is_invalid() {
            tracing::error!("transport session permanently invalid, giving up on reconnect");
            return;
        }
        *shared.session.lock() = SessionState::Disconnected;

        let delay = backoff.next_delay();
        tracing::info!(delay_ms = delay.as_millis() as u64, "reconnecting transport");
        tokio::time::sleep(delay).await;
    }
}

async fn connect_and_serve(
    url: &str,
    identity: &DeviceIdentity,
    signing_key: &SigningKey,
    shared: &Arc<Shared>,
    inbound_tx: &mpsc::UnboundedSender<InboundFrame>,
) -> Result<(), TransportError> {
    let (ws, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| TransportError::SendFailed(e.to_string()))?;
    let (mut write, mut read) = ws.split();

    let register = crate::frame::OutboundFrame::Register {
        device_id: identity.device_id.clone(),
        tenant_id: identity.tenant_id.clone(),
        hostname: identity.hostname.clone(),
        agent_version: identity.agent_version.clone(),
    }
    .to_json();
    write
        .send(Message::Text(register.to_string()))
        .await
        .map_err(|e| TransportError::SendFailed(e.to_string()))?;

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Value>();
    *shared.outbound_tx.lock() = Some(outbound_tx);
    *shared.session.lock() = SessionState::Connected;

    let mut heartbeat_interval = tokio::time::interval(DEFAULT_HEARTBEAT);
    heartbeat_interval.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            frame = outbound_rx.recv() => {
                match frame {
                    Some(value) => {
                        let payload = value.to_string();
                        let signature = signing_key.sign(payload.as_bytes());
                        let signed = serde_json::json!({ "frame": value, "signature": signature });
                        if write.send(Message::Text(signed.to_string())).await.is_err() {
                            return Ok(());
                        }
                    }
                    None => return Ok(()), // sender half dropped, shutting down
                }
            }

            _ = heartbeat_interval.tick() => {
                let frame = crate::frame::OutboundFrame::Heartbeat { device_id: identity.device_id.clone() }.to_json();
                if write.send(Message::Text(frame.to_string())).await.is_err() {
                    return Ok(());
                }
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_inbound(&text, shared, inbound_tx, &mut heartbeat_interval);
                        if shared.session.lock().is_invalid() {
                            return Ok(());
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(TransportError::SendFailed(e.to_string())),
                }
            }
        }
    }
}

fn handle_inbound(
    text: &str,
    shared: &Arc<Shared>,
    inbound_tx: &mpsc::UnboundedSender<InboundFrame>,
    heartbeat_interval: &mut tokio::time::Interval,
) {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "dropping malformed inbound transport frame");
            return;
        }
    };

    match frame.kind.as_str() {
        inbound_kind::SESSION_EXPIRED => {
            *shared.session.lock() = SessionState::Invalid(SessionStatus::SessionExpired);
        }
        inbound_kind::AUTH_FAILED => {
            *shared.session.lock() = SessionState::Invalid(SessionStatus::AuthFailed);
        }
        inbound_kind::BILLING_EXPIRED => {
            *shared.session.lock() = SessionState::Invalid(SessionStatus::BillingExpired);
        }
        inbound_kind::WELCOME => {
            if let Some(secs) = frame.field("heartbeat_interval_secs").and_then(Value::as_u64) {
                *heartbeat_interval = tokio::time::interval(Duration::from_secs(secs.max(1)));
            }
        }
        _ => {}
    }

    let _ = inbound_tx.send(frame);
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
