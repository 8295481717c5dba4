// src/adapter/mod.rs

//! The contract every backend integration satisfies.
//!
//! Adapters are stateless from the orchestrator's perspective: they may hold
//! internal pools or connections, but expose no mutable state through this
//! interface. Expected failures come back as `Error`-status results, never
//! as `Err`; `Err` is reserved for bugs and is converted at the call site.

pub mod cache;
pub mod canonical;
pub mod enrichment;
pub mod registry;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::intent::{IntentKind, MemoryIntent};

/// Whether an adapter is the system of record or a best-effort mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterRole {
    /// Single source of truth; receives unredacted content.
    Canonical,
    /// Mirror or enrichment source; receives the sanitized variant.
    Secondary,
}

/// How a single adapter invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Ok,
    Skipped,
    Error,
}

/// A scored text snippet contributed in response to a context fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub text: String,
    pub score: f32,
    /// Which backend contributed the snippet, e.g. "sqlite" or "enrichment".
    pub source: String,
}

/// What one `handle` call produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub error: Option<String>,
    /// Only meaningful for `FetchContext`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_items: Vec<ContextItem>,
}

impl ExecutionResult {
    pub fn ok() -> Self {
        Self {
            status: ExecutionStatus::Ok,
            error: None,
            context_items: Vec::new(),
        }
    }

    pub fn ok_with_context(context_items: Vec<ContextItem>) -> Self {
        Self {
            status: ExecutionStatus::Ok,
            error: None,
            context_items,
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: ExecutionStatus::Skipped,
            error: None,
            context_items: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            error: Some(message.into()),
            context_items: Vec::new(),
        }
    }
}

/// Monotonic clock threaded through adapter calls so tests can control time.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Process-monotonic clock backed by [`Instant`].
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Execution-scoped context passed to every adapter call.
#[derive(Clone)]
pub struct AdapterContext {
    pub clock: Arc<dyn Clock>,
}

impl AdapterContext {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl Default for AdapterContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for any memory backend the orchestrator can dispatch to.
#[async_trait]
pub trait MemoryAdapter: Send + Sync {
    /// Short stable identifier, e.g. "sqlite", "cache", "enrichment".
    fn id(&self) -> &str;

    /// Canonical adapters receive full-fidelity intents; everyone else gets
    /// the sanitized variant.
    fn role(&self) -> AdapterRole {
        AdapterRole::Secondary
    }

    /// Intent kinds this adapter is invoked for; anything else is skipped
    /// without an invocation.
    fn supported_intents(&self) -> &[IntentKind];

    /// Handle one intent. Backend-unreachable, not-found and similar expected
    /// failure modes must be reported via an `Error`-status result.
    async fn handle(
        &self,
        intent: &MemoryIntent,
        ctx: &AdapterContext,
    ) -> anyhow::Result<ExecutionResult>;

    fn supports(&self, kind: IntentKind) -> bool {
        self.supported_intents().contains(&kind)
    }
}

/// Score a chronological list of snippets by recency: the newest gets 1.0,
/// older entries fall off linearly.
pub(crate) fn recency_scores(texts: Vec<String>, source: &str) -> Vec<ContextItem> {
    let total = texts.len();
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| ContextItem {
            text,
            score: (i + 1) as f32 / total as f32,
            source: source.to_string(),
        })
        .collect()
}
