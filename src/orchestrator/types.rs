// src/orchestrator/types.rs

//! Result and option types for orchestration runs.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{ContextItem, ExecutionStatus};
use crate::intent::{IntentKind, MemoryIntent};

// ============================================================================
// Per-adapter reports
// ============================================================================

/// Outcome of one adapter considered during a run, including skipped ones.
#[derive(Debug, Clone)]
pub struct AdapterRunReport {
    pub adapter_id: String,
    /// Kind of the intent variant actually delivered. May differ from the
    /// caller's original only in content, never in kind.
    pub intent_kind: IntentKind,
    pub status: ExecutionStatus,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub context_items: Vec<ContextItem>,
}

// ============================================================================
// Aggregate result
// ============================================================================

/// Rolled-up status across every adapter considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationStatus {
    /// No adapter failed (all-skipped runs land here too).
    Ok,
    /// Some adapters failed, at least one succeeded.
    Partial,
    /// Every invoked adapter failed.
    Error,
}

/// The aggregate handed back to the caller. Nothing is persisted by the
/// orchestrator itself; this value is created fresh per call.
#[derive(Debug, Clone)]
pub struct OrchestratorResult {
    /// The caller's original, unsanitized intent.
    pub intent: Arc<MemoryIntent>,
    pub status: OrchestrationStatus,
    /// One entry per adapter considered, in adapter-list order.
    pub reports: Vec<AdapterRunReport>,
    /// Merged context, populated only for `FetchContext` runs where at least
    /// one adapter contributed items.
    pub context: Option<Vec<ContextItem>>,
}

// ============================================================================
// Options
// ============================================================================

/// Knobs for a single orchestration call.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Upper bound on any single adapter invocation. Elapse degrades that
    /// adapter to an error report; the run continues. `None` leaves adapters
    /// to enforce their own timeouts.
    pub adapter_deadline: Option<Duration>,
}

impl OrchestratorOptions {
    /// Load options from environment variables.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(val) = std::env::var("MEMRELAY_ADAPTER_DEADLINE_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                options.adapter_deadline = Some(Duration::from_millis(ms));
            }
        }

        options
    }
}
