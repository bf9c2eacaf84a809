// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> Signature {
    Signature {
        signature_id: SignatureId::new("sig-1"),
        severity: Severity::Warning,
        confidence: 90,
        symptoms: vec![],
        targets: vec![],
        context: SignatureContext {
            os_build: "19045".into(),
            os_version: "10".into(),
            device_role: "workstation".into(),
        },
    }
}

#[test]
fn confidence_modifier_scales_and_rounds() {
    let mut sig = sample();
    sig.apply_confidence_modifier(0.7);
    assert_eq!(sig.confidence, 63);
}

#[test]
fn confidence_modifier_clamps_to_one_hundred() {
    let mut sig = sample();
    sig.confidence = 95;
    sig.apply_confidence_modifier(1.5);
    assert_eq!(sig.confidence, 100);
}
