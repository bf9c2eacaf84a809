// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const HCL_RUNBOOK: &str = r#"
id = "service_restart"
name = "Restart a stopped Windows service"
estimated_duration_secs = 30
user_impact_class = "none"
version = 2

steps = [
  {
    name = "restart"
    kind = "service-control"
    action = "Restart-Service -Name {{service_name}}"
    timeout_secs = 30
  }
]

verification = [
  { step_name = "restart", expected = "running" }
]
"#;

const JSON_RUNBOOK: &str = r#"{
  "id": "disk_cleanup",
  "name": "Clear temp files",
  "estimated_duration_secs": 60,
  "user_impact_class": "none",
  "steps": [
    {
      "name": "cleanup",
      "kind": "shell-invoke",
      "action": "Remove-Item -Path C:\\Temp\\* -Recurse -Force",
      "timeout_secs": 60
    }
  ]
}"#;

#[test]
fn parses_hcl_runbook() {
    let rb = parse_runbook(HCL_RUNBOOK, Format::Hcl).unwrap();
    assert_eq!(rb.id.as_str(), "service_restart");
    assert_eq!(rb.steps.len(), 1);
    assert_eq!(rb.version, 2);
    assert_eq!(rb.verification.len(), 1);
}

#[test]
fn parses_json_runbook() {
    let rb = parse_runbook(JSON_RUNBOOK, Format::Json).unwrap();
    assert_eq!(rb.id.as_str(), "disk_cleanup");
    assert_eq!(rb.steps.len(), 1);
}

#[test]
fn parsed_runbook_has_provisional_class_c_pending_classification() {
    let rb = parse_runbook(HCL_RUNBOOK, Format::Hcl).unwrap();
    assert_eq!(rb.risk_class, RiskClass::C);
}

#[test]
fn rejects_runbook_that_fails_structural_validation() {
    let bad = r#"
id = "no_steps"
name = "Empty runbook"
estimated_duration_secs = 1
user_impact_class = "none"
steps = []
"#;
    let err = parse_runbook(bad, Format::Hcl).unwrap_err();
    assert!(matches!(err, ParseError::Invalid { .. }));
}

#[test]
fn rejects_malformed_hcl() {
    let err = parse_runbook("id = ", Format::Hcl).unwrap_err();
    assert!(matches!(err, ParseError::Hcl(_)));
}

#[test]
fn format_from_extension_recognizes_supported_formats() {
    assert_eq!(Format::from_extension("hcl"), Some(Format::Hcl));
    assert_eq!(Format::from_extension("toml"), Some(Format::Toml));
    assert_eq!(Format::from_extension("json"), Some(Format::Json));
    assert_eq!(Format::from_extension("yaml"), None);
}
