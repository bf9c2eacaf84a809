// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded diagnostic collector (§4.9: pre-escalation diagnostics, budget
//! <=15s), specified as a trait since only its contract matters here — the
//! concrete OS-level diagnostics (process list, disk SMART data, event log
//! excerpts) are out of scope, mirroring how `warden_adapters` specifies
//! `NotifyAdapter`/`SessionAdapter` as traits with a real and a fake impl.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

#[async_trait]
pub trait DiagnosticCollector: Clone + Send + Sync + 'static {
    /// Run the collector for `category`, bounded by `budget`. Returns
    /// whatever key-value facts the collector gathered; an empty map is a
    /// valid (if uninformative) result, never an error that would block
    /// escalation.
    async fn collect(&self, category: &str, budget: Duration) -> HashMap<String, String>;
}

/// Production default: real OS diagnostics are out of scope for this
/// build, so escalations proceed with an empty diagnostic payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDiagnosticCollector;

#[async_trait]
impl DiagnosticCollector for NoOpDiagnosticCollector {
    async fn collect(&self, _category: &str, _budget: Duration) -> HashMap<String, String> {
        HashMap::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDiagnosticCollector;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::DiagnosticCollector;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    pub struct FakeDiagnosticCollector {
        responses: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
    }

    impl FakeDiagnosticCollector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_response(&self, category: impl Into<String>, facts: HashMap<String, String>) {
            self.responses.lock().insert(category.into(), facts);
        }
    }

    #[async_trait]
    impl DiagnosticCollector for FakeDiagnosticCollector {
        async fn collect(&self, category: &str, _budget: Duration) -> HashMap<String, String> {
            self.responses.lock().get(category).cloned().unwrap_or_default()
        }
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
