// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling operator IPC (A.5).
//!
//! Runs in a spawned task, accepting connections and decoding requests
//! without blocking the main loop. The pipeline domain is single-writer
//! (§5), so every request that touches it is forwarded over a channel to
//! the main loop and answered with a one-shot reply — the listener itself
//! never locks or mutates the domain directly.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot, Notify};
use tracing::{debug, error, warn};

use warden_storage::MaterializedState;

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT};

/// A decoded request plus the channel to deliver its response on.
pub struct DaemonCommand {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

/// Shared daemon context for the listener.
pub struct ListenCtx {
    pub state: Arc<Mutex<MaterializedState>>,
    pub start_time: Instant,
    pub shutdown: Arc<Notify>,
    pub commands: mpsc::Sender<DaemonCommand>,
}

pub struct Listener {
    socket: UnixListener,
    ctx: Arc<ListenCtx>,
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("daemon is not accepting commands")]
    CommandChannelClosed,
}

impl Listener {
    pub fn new(socket: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { socket, ctx }
    }

    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            match e {
                                ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
                                    debug!("client disconnected")
                                }
                                ConnectionError::Protocol(protocol::ProtocolError::Timeout) => warn!("connection timeout"),
                                _ => error!("connection error: {}", e),
                            }
                        }
                    });
                }
                Err(e) => error!("accept error: {}", e),
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, ctx: &ListenCtx) -> Result<(), ConnectionError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await?;
    tracing::info!(request = ?request, "received request");

    let response = handle_request(request, ctx).await;

    debug!(?response, "sending response");
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

async fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    // `Shutdown` is the one request the main loop watches for directly
    // (via `ListenCtx::shutdown`), not through the command channel —
    // shutting down is exactly the moment the main loop might be busy
    // draining a full command queue, so it can't be made to wait on itself.
    if let Request::Shutdown { .. } = request {
        ctx.shutdown.notify_one();
        return Response::Ok;
    }

    let (reply_tx, reply_rx) = oneshot::channel();
    if ctx.commands.send(DaemonCommand { request, reply: reply_tx }).await.is_err() {
        return Response::Error { message: "daemon is shutting down".into() };
    }
    match reply_rx.await {
        Ok(response) => response,
        Err(_) => Response::Error { message: "daemon dropped the request without replying".into() },
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
