// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn returns_set_value() {
    let store = FakeCredentialStore::new();
    store.set("WARDEN_BEARER_TOKEN", "abc123");
    let resolved = store
        .resolve(&CredentialSource::EnvVar("WARDEN_BEARER_TOKEN".to_string()))
        .await
        .unwrap();
    assert_eq!(resolved, "abc123");
}

#[tokio::test]
async fn unset_key_is_an_error() {
    let store = FakeCredentialStore::new();
    let result = store.resolve(&CredentialSource::EnvVar("NEVER_SET".to_string())).await;
    assert!(result.is_err());
}
