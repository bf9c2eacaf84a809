// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn step(name: &str, kind: StepKind) -> RunbookStep {
    RunbookStep {
        name: name.into(),
        kind,
        action: "noop".into(),
        parameters: HashMap::new(),
        timeout_secs: default_step_timeout_secs(),
        allow_failure: false,
        requires_approval: false,
        rollback_on_failure: false,
    }
}

#[test]
fn default_step_timeout_is_sixty_seconds() {
    assert_eq!(default_step_timeout_secs(), 60);
}

#[test]
fn is_class_a_only_true_for_class_a() {
    let mut rb = Runbook {
        id: RunbookId::new("rb-1"),
        name: "service_start_generic".into(),
        risk_class: RiskClass::A,
        steps: vec![step("start", StepKind::ServiceControl)],
        verification: vec![],
        rollback_steps: vec![],
        estimated_duration_secs: 30,
        user_impact_class: "low".into(),
        version: 1,
    };
    assert!(rb.is_class_a());
    rb.risk_class = RiskClass::B;
    assert!(!rb.is_class_a());
}

#[test]
fn risk_class_orders_a_below_c() {
    assert!(RiskClass::A < RiskClass::B);
    assert!(RiskClass::B < RiskClass::C);
}
