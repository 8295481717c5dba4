// src/intent/mod.rs

//! The closed set of operations the orchestrator can dispatch.
//!
//! An intent is immutable for the lifetime of one orchestration call;
//! sanitization produces a new value, never mutates the original.

pub mod sanitize;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One finalized conversational message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Speaker, e.g. "user" or "assistant".
    pub role: String,
    /// Message body as committed to the session transcript.
    pub content: String,
    /// Free-form metadata carried along with the turn.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }
}

/// The operation half of an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryOp {
    /// A turn was just finalized and must be persisted/mirrored.
    TurnCommitted { turn: ConversationTurn },
    /// Reconcile/flush a session's state across backends.
    SyncSession,
    /// (Re)populate historical data for a session.
    BackfillSession,
    /// Fetch relevant memory snippets to ground a new model turn.
    FetchContext { limit: Option<usize> },
}

/// Fieldless discriminant of [`MemoryOp`], used for adapter capability
/// declarations and dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    TurnCommitted,
    SyncSession,
    BackfillSession,
    FetchContext,
}

impl IntentKind {
    pub const ALL: [IntentKind; 4] = [
        IntentKind::TurnCommitted,
        IntentKind::SyncSession,
        IntentKind::BackfillSession,
        IntentKind::FetchContext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnCommitted => "turn_committed",
            Self::SyncSession => "sync_session",
            Self::BackfillSession => "backfill_session",
            Self::FetchContext => "fetch_context",
        }
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed request describing one memory operation for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryIntent {
    /// Opaque session identifier.
    pub session_id: String,
    /// Opaque user identifier.
    pub user_id: String,
    #[serde(flatten)]
    pub op: MemoryOp,
}

impl MemoryIntent {
    pub fn new(session_id: impl Into<String>, user_id: impl Into<String>, op: MemoryOp) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            op,
        }
    }

    pub fn turn_committed(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        turn: ConversationTurn,
    ) -> Self {
        Self::new(session_id, user_id, MemoryOp::TurnCommitted { turn })
    }

    pub fn sync_session(session_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::new(session_id, user_id, MemoryOp::SyncSession)
    }

    pub fn backfill_session(session_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::new(session_id, user_id, MemoryOp::BackfillSession)
    }

    pub fn fetch_context(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        limit: Option<usize>,
    ) -> Self {
        Self::new(session_id, user_id, MemoryOp::FetchContext { limit })
    }

    /// Discriminant of the carried operation. The match is exhaustive on
    /// purpose: a new op variant will not compile until it is handled here.
    pub fn kind(&self) -> IntentKind {
        match &self.op {
            MemoryOp::TurnCommitted { .. } => IntentKind::TurnCommitted,
            MemoryOp::SyncSession => IntentKind::SyncSession,
            MemoryOp::BackfillSession => IntentKind::BackfillSession,
            MemoryOp::FetchContext { .. } => IntentKind::FetchContext,
        }
    }
}
