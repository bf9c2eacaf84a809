// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! warden-engine: the pipeline domain runtime.
//!
//! Wires the data model in `warden_core` into the single-writer pipeline
//! described by §5: Signal Normalizer (C1) and Behavioral Profiler (C2)
//! feed the gate chain (maintenance, state tracker, dependency suppression,
//! flap rewrite, profiler consult, sustained-breach hysteresis), which
//! drives the Signature Generator / Runbook Classifier / Remediation
//! Memory already in `warden_core` and `warden_runbook`, culminating in one
//! Decision Engine (C8) call per signature and either an Escalation (C9) or
//! a Playbook Queue (C10) admission.

pub mod decision_engine;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod escalation;
pub mod executor;
pub mod maintenance_gate;
pub mod normalizer;
pub mod playbook_queue;
pub mod profiler;
pub mod scheduler;
pub mod signature_generator;
pub mod state_tracker;

pub use decision_engine::decide;
pub use diagnostics::{DiagnosticCollector, NoOpDiagnosticCollector};
pub use domain::{DeviceContext, PipelineDomain};
pub use error::EngineError;
pub use escalation::EscalationProtocol;
pub use executor::{ExecuteError, Executor};
pub use maintenance_gate::MaintenanceGate;
pub use normalizer::Normalizer;
pub use playbook_queue::PlaybookQueue;
pub use profiler::Profiler;
pub use scheduler::Scheduler;
pub use signature_generator::{generate as generate_signature, match_runbook};
pub use state_tracker::StateTracker;

#[cfg(any(test, feature = "test-support"))]
pub use diagnostics::FakeDiagnosticCollector;
