// src/adapter/canonical.rs

//! Canonical store adapter: full-fidelity writes into the SQLite turn store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::adapter::{
    AdapterContext, AdapterRole, ExecutionResult, MemoryAdapter, recency_scores,
};
use crate::intent::{IntentKind, MemoryIntent, MemoryOp};
use crate::storage::TurnStore;

/// Context items returned when the caller doesn't bound the fetch.
const DEFAULT_FETCH_LIMIT: usize = 20;

pub struct CanonicalStoreAdapter {
    store: Arc<TurnStore>,
}

impl CanonicalStoreAdapter {
    pub fn new(store: Arc<TurnStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MemoryAdapter for CanonicalStoreAdapter {
    fn id(&self) -> &str {
        "sqlite"
    }

    fn role(&self) -> AdapterRole {
        AdapterRole::Canonical
    }

    fn supported_intents(&self) -> &[IntentKind] {
        &IntentKind::ALL
    }

    async fn handle(
        &self,
        intent: &MemoryIntent,
        _ctx: &AdapterContext,
    ) -> anyhow::Result<ExecutionResult> {
        let outcome = match &intent.op {
            MemoryOp::TurnCommitted { turn } => self
                .store
                .save_turn(&intent.session_id, &intent.user_id, turn)
                .await
                .map(|id| {
                    debug!("Persisted turn {} for session {}", id, intent.session_id);
                    ExecutionResult::ok()
                }),
            MemoryOp::SyncSession => self
                .store
                .checkpoint_session(&intent.session_id, &intent.user_id)
                .await
                .map(|()| ExecutionResult::ok()),
            MemoryOp::BackfillSession => self
                .store
                .rebuild_session(&intent.session_id, &intent.user_id)
                .await
                .map(|_| ExecutionResult::ok()),
            MemoryOp::FetchContext { limit } => {
                let n = limit.unwrap_or(DEFAULT_FETCH_LIMIT);
                self.store
                    .load_recent(&intent.session_id, n)
                    .await
                    .map(|stored| {
                        let texts = stored.into_iter().map(|s| s.turn.content).collect();
                        ExecutionResult::ok_with_context(recency_scores(texts, "sqlite"))
                    })
            }
        };

        // Store failures (locked file, bad disk) are an expected mode here,
        // not a contract violation.
        Ok(outcome.unwrap_or_else(|err| ExecutionResult::error(err.to_string())))
    }
}
