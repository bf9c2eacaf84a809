// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::protocol::Response;
use std::time::Instant;
use warden_storage::MaterializedState;

#[tokio::test]
async fn shutdown_request_notifies_without_touching_the_command_channel() {
    let (tx, mut rx) = mpsc::channel(1);
    let ctx = ListenCtx {
        state: Arc::new(Mutex::new(MaterializedState::default())),
        start_time: Instant::now(),
        shutdown: Arc::new(Notify::new()),
        commands: tx,
    };

    let response = handle_request(Request::Shutdown { kill: false }, &ctx).await;
    assert!(matches!(response, Response::Ok));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn status_request_is_forwarded_to_the_command_channel() {
    let (tx, mut rx) = mpsc::channel(1);
    let ctx = ListenCtx {
        state: Arc::new(Mutex::new(MaterializedState::default())),
        start_time: Instant::now(),
        shutdown: Arc::new(Notify::new()),
        commands: tx,
    };

    let handle = tokio::spawn(async move { handle_request(Request::Status, &ctx).await });
    let cmd = rx.recv().await.expect("command forwarded");
    assert!(matches!(cmd.request, Request::Status));
    let _ = cmd.reply.send(Response::Ok);
    assert!(matches!(handle.await.unwrap(), Response::Ok));
}
