//! Ignore-list command specs.

use crate::prelude::*;

#[test]
fn exclude_add_then_list_then_remove_round_trips() {
    let device = Device::new();
    device.warden().args(&["daemon", "start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || {
        device
            .warden()
            .args(&["exclude", "list"])
            .command()
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    });

    device
        .warden()
        .args(&["exclude", "add", "services", "backup-agent"])
        .passes()
        .stdout_has("Added");

    device
        .warden()
        .args(&["exclude", "list"])
        .passes()
        .stdout_has("backup-agent");

    device
        .warden()
        .args(&["exclude", "remove", "services", "backup-agent"])
        .passes()
        .stdout_has("Removed");

    device
        .warden()
        .args(&["exclude", "list"])
        .passes()
        .stdout_has("(none)");
}

#[test]
fn exclude_add_rejects_unknown_category() {
    let device = Device::new();
    device.warden().args(&["daemon", "start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || {
        device
            .warden()
            .args(&["exclude", "list"])
            .command()
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    });

    device
        .warden()
        .args(&["exclude", "add", "bogus-category", "x"])
        .fails()
        .stderr_has("invalid category");
}
