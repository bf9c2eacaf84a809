//! Pending-action command specs against an idle daemon.

use crate::prelude::*;

#[test]
fn pending_list_on_idle_device_is_empty() {
    let device = Device::new();
    device.warden().args(&["daemon", "start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || {
        device
            .warden()
            .args(&["pending", "list"])
            .command()
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    });

    device
        .warden()
        .args(&["pending", "list"])
        .passes()
        .stdout_has("No pending actions");
}

#[test]
fn pending_approve_unknown_signature_fails() {
    let device = Device::new();
    device.warden().args(&["daemon", "start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || {
        device
            .warden()
            .args(&["pending", "list"])
            .command()
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    });

    device
        .warden()
        .args(&["pending", "approve", "sig-does-not-exist"])
        .fails();
}

#[test]
fn escalate_triggers_without_error() {
    let device = Device::new();
    device.warden().args(&["daemon", "start"]).passes();
    wait_for(SPEC_WAIT_MAX_MS, || {
        device
            .warden()
            .args(&["status"])
            .command()
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).contains("running"))
            .unwrap_or(false)
    });

    device
        .warden()
        .args(&["escalate", "disk.full", "oncall"])
        .passes()
        .stdout_has("Escalation triggered");
}
