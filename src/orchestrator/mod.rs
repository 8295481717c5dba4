// src/orchestrator/mod.rs

//! Dispatch core: fans one intent out across an ordered adapter list.
//!
//! Adapters run sequentially in list order so the canonical write is always
//! attempted before any mirror observes a side effect of it, at the cost of
//! total latency being the sum of per-adapter latencies. No single-adapter
//! failure escapes this module; callers always get an aggregate result and
//! decide what to do with a partial one.

mod types;

pub use types::*;

use std::sync::Arc;

use tracing::{Instrument, debug, instrument, warn};

use crate::adapter::{
    AdapterContext, AdapterRole, ContextItem, ExecutionResult, ExecutionStatus, MemoryAdapter,
};
use crate::intent::sanitize::SanitizedIntent;
use crate::intent::{IntentKind, MemoryIntent};
use crate::telemetry;

/// Fallback when an adapter fails without saying why.
const UNSPECIFIED_FAILURE: &str = "adapter failed without a message";

/// Run one intent through the adapter list with default options.
pub async fn orchestrate(
    intent: Arc<MemoryIntent>,
    adapters: &[Arc<dyn MemoryAdapter>],
    ctx: &AdapterContext,
) -> OrchestratorResult {
    orchestrate_with_options(intent, adapters, ctx, &OrchestratorOptions::default()).await
}

/// Run one intent through the adapter list.
///
/// Sequence per adapter, in list order: skip without invoking if the kind is
/// unsupported; deliver the canonical variant to the canonical role and the
/// sanitized variant to everyone else; time the call; convert thrown errors
/// and deadline elapse into error reports; aggregate any contributed context.
#[instrument(
    name = "memory_orchestration",
    skip_all,
    fields(
        intent = %intent.kind(),
        session_id = %intent.session_id,
        user_id = %telemetry::scrub_attr(&intent.user_id),
    )
)]
pub async fn orchestrate_with_options(
    intent: Arc<MemoryIntent>,
    adapters: &[Arc<dyn MemoryAdapter>],
    ctx: &AdapterContext,
    options: &OrchestratorOptions,
) -> OrchestratorResult {
    let kind = intent.kind();
    let sanitized = SanitizedIntent::build(Arc::clone(&intent));
    if sanitized.pii_scrubbed {
        debug!("scrubbed PII from the secondary intent variant");
    }

    let mut reports = Vec::with_capacity(adapters.len());
    let mut aggregated: Vec<ContextItem> = Vec::new();
    let mut had_error = false;
    let mut any_success = false;

    for adapter in adapters {
        if !adapter.supports(kind) {
            reports.push(AdapterRunReport {
                adapter_id: adapter.id().to_string(),
                intent_kind: kind,
                status: ExecutionStatus::Skipped,
                error: None,
                duration_ms: 0,
                context_items: Vec::new(),
            });
            continue;
        }

        let delivered = match adapter.role() {
            AdapterRole::Canonical => &sanitized.canonical,
            AdapterRole::Secondary => &sanitized.secondary,
        };

        let start = ctx.now_ms();
        let execution = invoke_adapter(adapter.as_ref(), delivered, ctx, options).await;
        let duration_ms = ctx.now_ms().saturating_sub(start);

        match execution.status {
            ExecutionStatus::Ok => any_success = true,
            ExecutionStatus::Error => {
                had_error = true;
                warn!(
                    adapter = adapter.id(),
                    error = execution.error.as_deref().unwrap_or(UNSPECIFIED_FAILURE),
                    "adapter failed"
                );
            }
            ExecutionStatus::Skipped => {}
        }

        aggregated.extend(execution.context_items.iter().cloned());

        reports.push(AdapterRunReport {
            adapter_id: adapter.id().to_string(),
            intent_kind: delivered.kind(),
            status: execution.status,
            error: execution.error,
            duration_ms,
            context_items: execution.context_items,
        });
    }

    let status = rollup(had_error, any_success);
    let context = if kind == IntentKind::FetchContext && !aggregated.is_empty() {
        Some(aggregated)
    } else {
        None
    };

    debug!(status = ?status, adapters = reports.len(), "orchestration finished");

    OrchestratorResult {
        intent,
        status,
        reports,
        context,
    }
}

/// Invoke one adapter under its own span, converting `Err` and deadline
/// elapse into `Error`-status results so nothing propagates.
async fn invoke_adapter(
    adapter: &dyn MemoryAdapter,
    intent: &MemoryIntent,
    ctx: &AdapterContext,
    options: &OrchestratorOptions,
) -> ExecutionResult {
    let span = tracing::debug_span!(
        "memory_adapter",
        adapter = adapter.id(),
        intent = %intent.kind(),
    );

    let call = adapter.handle(intent, ctx);

    let outcome = match options.adapter_deadline {
        Some(deadline) => match tokio::time::timeout(deadline, call.instrument(span)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return ExecutionResult::error(format!(
                    "deadline of {}ms exceeded",
                    deadline.as_millis()
                ));
            }
        },
        None => call.instrument(span).await,
    };

    match outcome {
        Ok(execution) => execution,
        Err(err) => {
            let message = err.to_string();
            if message.trim().is_empty() {
                ExecutionResult::error(UNSPECIFIED_FAILURE)
            } else {
                ExecutionResult::error(message)
            }
        }
    }
}

/// Status table: `Error` iff every invoked adapter failed, `Partial` iff
/// failures were mixed with successes, `Ok` otherwise. Skips affect nothing.
fn rollup(had_error: bool, any_success: bool) -> OrchestrationStatus {
    match (had_error, any_success) {
        (true, false) => OrchestrationStatus::Error,
        (true, true) => OrchestrationStatus::Partial,
        (false, _) => OrchestrationStatus::Ok,
    }
}
