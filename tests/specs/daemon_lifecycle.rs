//! Daemon process lifecycle specs.

use crate::prelude::*;

#[test]
fn status_reports_not_running_before_start() {
    let device = Device::new();
    device
        .warden()
        .args(&["status"])
        .passes()
        .stdout_has("not running");
}

#[test]
fn daemon_start_then_status_reports_running() {
    let device = Device::new();

    device.warden().args(&["daemon", "start"]).passes();

    let became_running = wait_for(SPEC_WAIT_MAX_MS, || {
        device
            .warden()
            .args(&["status"])
            .command()
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).contains("running"))
            .unwrap_or(false)
    });
    assert!(became_running, "daemon did not report running within timeout");

    device
        .warden()
        .args(&["status"])
        .passes()
        .stdout_has("Status:")
        .stdout_has("Version:");
}

#[test]
fn daemon_stop_on_idle_device_reports_not_running() {
    let device = Device::new();
    device
        .warden()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("not running");
}

#[test]
fn daemon_start_then_stop_round_trips() {
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
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("stopped");
}
