// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use crate::config::{Config as AppConfig, CredentialRef};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::tempdir;

/// `std::env::set_var` for a credential is process-global, so give every
/// test its own variable name to avoid racing its siblings.
fn unique_env_var() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("WARDEN_TEST_CREDENTIAL_{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

fn test_paths(dir: &std::path::Path) -> Paths {
    Paths {
        socket_path: dir.join("daemon.sock"),
        lock_path: dir.join("daemon.pid"),
        version_path: dir.join("daemon.version"),
        log_path: dir.join("daemon.log"),
        wal_path: dir.join("wal").join("events.wal"),
        snapshot_path: dir.join("snapshot.json"),
        config_path: dir.join("config.toml"),
        runbooks_path: dir.join("runbooks"),
        dependency_dag_path: dir.join("dependency_dag.json"),
        state_dir: dir.to_path_buf(),
    }
}

fn test_config(credential_var: &str) -> AppConfig {
    AppConfig {
        tenant_id: "tenant-1".to_string(),
        device_id: "device-1".to_string(),
        credential: CredentialRef::EnvVar { name: credential_var.to_string() },
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn startup_creates_the_on_disk_layout() {
    let dir = tempdir().unwrap();
    let paths = test_paths(dir.path());
    let var = unique_env_var();
    std::env::set_var(&var, "super-secret-bearer-token");
    let config = test_config(&var);

    let result = startup(&config, &paths).await.unwrap();
    std::env::remove_var(&var);

    assert!(paths.lock_path.exists());
    assert!(paths.version_path.exists());
    assert!(paths.runbooks_path.is_dir());
    assert!(paths.socket_path.exists());
    assert_eq!(result.daemon.domain.device().device_id, "device-1");
    assert!(!result.daemon.domain.transport_connected());
}

#[tokio::test]
async fn startup_fails_when_the_credential_env_var_is_unset() {
    let dir = tempdir().unwrap();
    let paths = test_paths(dir.path());
    let config = test_config("WARDEN_TEST_CREDENTIAL_DOES_NOT_EXIST");

    let err = startup(&config, &paths).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Credential(_)));
    // Startup failure cleans up anything it created.
    assert!(!paths.socket_path.exists());
}

#[tokio::test]
async fn second_startup_holds_the_lock() {
    let dir = tempdir().unwrap();
    let paths = test_paths(dir.path());
    let var = unique_env_var();
    std::env::set_var(&var, "super-secret-bearer-token");
    let config = test_config(&var);

    let first = startup(&config, &paths).await.unwrap();
    let second = startup(&config, &paths).await;
    std::env::remove_var(&var);

    assert!(matches!(second, Err(LifecycleError::LockFailed(_))));
    drop(first);
}

#[tokio::test]
async fn shutdown_removes_socket_pid_and_version_files() {
    let dir = tempdir().unwrap();
    let paths = test_paths(dir.path());
    let var = unique_env_var();
    std::env::set_var(&var, "super-secret-bearer-token");
    let config = test_config(&var);

    let mut result = startup(&config, &paths).await.unwrap();
    std::env::remove_var(&var);

    result.daemon.shutdown().unwrap();

    assert!(!paths.socket_path.exists());
    assert!(!paths.lock_path.exists());
    assert!(!paths.version_path.exists());
}

#[tokio::test]
async fn restart_replays_events_from_the_wal() {
    let dir = tempdir().unwrap();
    let paths = test_paths(dir.path());
    let var = unique_env_var();
    std::env::set_var(&var, "super-secret-bearer-token");
    let config = test_config(&var);

    let mut first = startup(&config, &paths).await.unwrap();
    first.daemon.persist(warden_core::Event::ExclusionAdded {
        category: warden_core::IgnoreCategory::Services,
        name: "spooler".to_string(),
    });
    first.daemon.event_bus.flush().unwrap();
    first.daemon.shutdown().unwrap();
    drop(first);

    let second = startup(&config, &paths).await.unwrap();
    std::env::remove_var(&var);

    let state = second.daemon.state.lock();
    assert!(state.exclusions.contains_service("spooler"));
}
