// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn missing_file_yields_defaults() {
    let config = Config::load(Path::new("/nonexistent/warden-daemon-test.toml")).unwrap();
    assert_eq!(config.thresholds.queue_depth, warden_engine::playbook_queue::MAX_QUEUE_DEPTH);
    assert!(config.hmac_enforced);
}

#[test]
fn parses_overrides_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        tenant_id = "acme"
        device_id = "host-1"
        transport_url = "wss://example.invalid/agent"
        cooldown_secs = 120
        queue_depth = 10

        [credential]
        kind = "env_var"
        name = "ACME_TOKEN"
        "#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.tenant_id, "acme");
    assert_eq!(config.thresholds.cooldown_secs, 120);
    assert_eq!(config.thresholds.queue_depth, 10);
    match config.credential {
        CredentialRef::EnvVar { name } => assert_eq!(name, "ACME_TOKEN"),
        other => panic!("expected env var credential ref, got {other:?}"),
    }
}

#[test]
fn bad_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "not valid toml =====").unwrap();
    assert!(Config::load(&path).is_err());
}
