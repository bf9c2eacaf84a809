// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;
use warden_core::runbook::RiskClass;

const GOOD_RUNBOOK: &str = r#"
id = "service_restart"
name = "Restart a stopped Windows service"
estimated_duration_secs = 30
user_impact_class = "none"

steps = [
  {
    name = "restart"
    kind = "service-control"
    action = "Restart-Service -Name {{service_name}}"
    timeout_secs = 30
  }
]
"#;

const CLASS_C_RUNBOOK: &str = r#"
id = "disable_stale_account"
name = "Disable a stale local account"
estimated_duration_secs = 15
user_impact_class = "low"

steps = [
  {
    name = "disable"
    kind = "shell-invoke"
    action = "Disable-LocalUser -Name {{account_name}}"
    timeout_secs = 15
  }
]
"#;

const MALFORMED_RUNBOOK: &str = r#"
id = "broken"
"#;

#[test]
fn loads_and_classifies_every_valid_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("restart.hcl"), GOOD_RUNBOOK).unwrap();
    std::fs::write(dir.path().join("disable.hcl"), CLASS_C_RUNBOOK).unwrap();

    let runbooks = load_runbook_dir(dir.path()).unwrap();
    assert_eq!(runbooks.len(), 2);
    assert_eq!(runbooks["service_restart"].risk_class, RiskClass::A);
    assert_eq!(runbooks["disable_stale_account"].risk_class, RiskClass::C);
}

#[test]
fn skips_malformed_file_without_failing_the_whole_load() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("restart.hcl"), GOOD_RUNBOOK).unwrap();
    std::fs::write(dir.path().join("broken.hcl"), MALFORMED_RUNBOOK).unwrap();

    let runbooks = load_runbook_dir(dir.path()).unwrap();
    assert_eq!(runbooks.len(), 1);
    assert!(runbooks.contains_key("service_restart"));
}

#[test]
fn ignores_files_with_unrecognized_extensions() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("restart.hcl"), GOOD_RUNBOOK).unwrap();
    std::fs::write(dir.path().join("README.md"), "not a runbook").unwrap();

    let runbooks = load_runbook_dir(dir.path()).unwrap();
    assert_eq!(runbooks.len(), 1);
}

#[test]
fn errors_on_nonexistent_directory() {
    let result = load_runbook_dir(Path::new("/nonexistent/path/does/not/exist"));
    assert!(result.is_err());
}
