// src/adapter/cache.rs

//! In-process recent-turn cache: a bounded per-session mirror that keeps
//! fetches cheap while the canonical store stays the source of truth.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::adapter::{
    AdapterContext, ExecutionResult, MemoryAdapter, recency_scores,
};
use crate::intent::{ConversationTurn, IntentKind, MemoryIntent, MemoryOp};
use crate::storage::TurnStore;

pub struct RecentCacheAdapter {
    /// Canonical store used to repopulate sessions on backfill.
    store: Arc<TurnStore>,
    capacity_per_session: usize,
    sessions: RwLock<HashMap<String, VecDeque<ConversationTurn>>>,
}

impl RecentCacheAdapter {
    pub fn new(store: Arc<TurnStore>, capacity_per_session: usize) -> Self {
        Self {
            store,
            capacity_per_session: capacity_per_session.max(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn push(&self, session_id: &str, turn: ConversationTurn) {
        let mut sessions = self.sessions.write().await;
        let buffer = sessions.entry(session_id.to_string()).or_default();
        buffer.push_back(turn);
        while buffer.len() > self.capacity_per_session {
            buffer.pop_front();
        }
    }

    async fn invalidate(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    /// Number of cached turns for a session.
    pub async fn cached_len(&self, session_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl MemoryAdapter for RecentCacheAdapter {
    fn id(&self) -> &str {
        "cache"
    }

    fn supported_intents(&self) -> &[IntentKind] {
        &IntentKind::ALL
    }

    async fn handle(
        &self,
        intent: &MemoryIntent,
        _ctx: &AdapterContext,
    ) -> anyhow::Result<ExecutionResult> {
        match &intent.op {
            MemoryOp::TurnCommitted { turn } => {
                self.push(&intent.session_id, turn.clone()).await;
                Ok(ExecutionResult::ok())
            }
            MemoryOp::SyncSession => {
                self.invalidate(&intent.session_id).await;
                debug!("Invalidated cache for session {}", intent.session_id);
                Ok(ExecutionResult::ok())
            }
            MemoryOp::BackfillSession => {
                // Preload from the canonical store; a failed read degrades to
                // an error result and leaves the cache untouched.
                match self
                    .store
                    .load_recent(&intent.session_id, self.capacity_per_session)
                    .await
                {
                    Ok(stored) => {
                        let mut sessions = self.sessions.write().await;
                        let buffer = sessions.entry(intent.session_id.clone()).or_default();
                        buffer.clear();
                        buffer.extend(stored.into_iter().map(|s| s.turn));
                        debug!(
                            "Preloaded {} turns into cache for session {}",
                            buffer.len(),
                            intent.session_id
                        );
                        Ok(ExecutionResult::ok())
                    }
                    Err(err) => Ok(ExecutionResult::error(format!("backfill read failed: {err}"))),
                }
            }
            MemoryOp::FetchContext { limit } => {
                let sessions = self.sessions.read().await;
                let Some(buffer) = sessions.get(&intent.session_id) else {
                    debug!("Cache MISS for session {}", intent.session_id);
                    return Ok(ExecutionResult::ok());
                };

                let n = limit.unwrap_or(buffer.len()).min(buffer.len());
                let texts = buffer
                    .iter()
                    .skip(buffer.len() - n)
                    .map(|turn| turn.content.clone())
                    .collect();
                Ok(ExecutionResult::ok_with_context(recency_scores(
                    texts, "cache",
                )))
            }
        }
    }
}
