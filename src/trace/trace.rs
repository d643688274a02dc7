use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::orchestrator::engine::DetectionMode;

/// One line of the decision trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub tick: u64,

    pub mode: String,

    pub decision: Option<String>,

    pub discovery: Option<String>,
    pub flow: Option<String>,
    pub page: Option<String>,
    pub stage: Option<String>,

    pub snapshot: Option<String>,
    pub suppression_reason: Option<String>,
}

impl TraceEvent {
    pub fn now(tick: u64, mode: DetectionMode) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            tick,
            mode: format!("{:?}", mode),
            decision: None,
            discovery: None,
            flow: None,
            page: None,
            stage: None,
            snapshot: None,
            suppression_reason: None,
        }
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_discovery(mut self, id: impl ToString) -> Self {
        self.discovery = Some(id.to_string());
        self
    }

    pub fn with_flow(mut self, id: impl ToString) -> Self {
        self.flow = Some(id.to_string());
        self
    }

    pub fn with_page(mut self, id: impl ToString) -> Self {
        self.page = Some(id.to_string());
        self
    }

    pub fn with_stage(mut self, id: impl ToString) -> Self {
        self.stage = Some(id.to_string());
        self
    }

    pub fn with_snapshot(mut self, fingerprint: impl ToString) -> Self {
        self.snapshot = Some(fingerprint.to_string());
        self
    }

    /// Candidates left out this tick, as `reason:id` pairs. Empty leaves the
    /// field unset.
    pub fn with_suppressed(mut self, reasons: &[String]) -> Self {
        if !reasons.is_empty() {
            self.suppression_reason = Some(reasons.join(","));
        }
        self
    }
}
