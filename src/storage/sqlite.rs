// src/storage/sqlite.rs

//! SQLite persistence for committed turns and per-session bookkeeping.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::{Executor, Row, SqlitePool};
use tracing::debug;

use crate::intent::ConversationTurn;

/// Latest schema for committed turns. Add columns here as fields evolve.
const CREATE_TURNS: &str = r#"
CREATE TABLE IF NOT EXISTS turns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    metadata TEXT,
    committed_at DATETIME NOT NULL
);
"#;

/// Derived per-session row: turn counter plus the last reconcile checkpoint.
const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    turn_count INTEGER NOT NULL DEFAULT 0,
    last_synced_at DATETIME
);
"#;

const CREATE_TURN_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_turns_session ON turns(session_id, committed_at);
"#;

/// A stored turn with its database identity.
#[derive(Debug, Clone)]
pub struct StoredTurn {
    pub id: i64,
    pub session_id: String,
    pub user_id: String,
    pub turn: ConversationTurn,
    pub committed_at: DateTime<Utc>,
}

/// Canonical turn store over a SQLite pool.
pub struct TurnStore {
    pool: SqlitePool,
}

impl TurnStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Safe to call at every startup (idempotent).
    pub async fn run_migrations(&self) -> Result<()> {
        self.pool.execute(CREATE_TURNS).await?;
        self.pool.execute(CREATE_SESSIONS).await?;
        self.pool.execute(CREATE_TURN_INDICES).await?;
        Ok(())
    }

    /// Insert one committed turn, returning its new id. Keeps the derived
    /// session row in step with the write.
    pub async fn save_turn(
        &self,
        session_id: &str,
        user_id: &str,
        turn: &ConversationTurn,
    ) -> Result<i64> {
        let metadata_json = if turn.metadata.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&turn.metadata)?)
        };

        let row = sqlx::query(
            r#"
            INSERT INTO turns (session_id, user_id, role, content, metadata, committed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(&turn.role)
        .bind(&turn.content)
        .bind(metadata_json)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, turn_count)
            VALUES (?, ?, 1)
            ON CONFLICT(session_id) DO UPDATE SET
                turn_count = turn_count + 1
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// Load the last `n` turns for a session, oldest first.
    pub async fn load_recent(&self, session_id: &str, n: usize) -> Result<Vec<StoredTurn>> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, user_id, role, content, metadata, committed_at
            FROM turns
            WHERE session_id = ?
            ORDER BY committed_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in rows {
            let metadata: Option<String> = row.get("metadata");
            let committed_at: NaiveDateTime = row.get("committed_at");

            turns.push(StoredTurn {
                id: row.get("id"),
                session_id: row.get("session_id"),
                user_id: row.get("user_id"),
                turn: ConversationTurn {
                    role: row.get("role"),
                    content: row.get("content"),
                    metadata: metadata
                        .as_deref()
                        .and_then(|s| serde_json::from_str(s).ok())
                        .unwrap_or_default(),
                },
                committed_at: Utc.from_utc_datetime(&committed_at),
            });
        }

        // Rows came back newest-first; callers want chronological order.
        turns.reverse();
        Ok(turns)
    }

    pub async fn session_turn_count(&self, session_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM turns WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Record that a session was reconciled across backends.
    pub async fn checkpoint_session(&self, session_id: &str, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, turn_count, last_synced_at)
            VALUES (?, ?, 0, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                last_synced_at = excluded.last_synced_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Recompute the derived session row from the turns actually on disk.
    /// Returns the recounted total.
    pub async fn rebuild_session(&self, session_id: &str, user_id: &str) -> Result<i64> {
        let count = self.session_turn_count(session_id).await?;

        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, turn_count)
            VALUES (?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                turn_count = excluded.turn_count
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(count)
        .execute(&self.pool)
        .await?;

        debug!("Rebuilt session {} from {} stored turns", session_id, count);
        Ok(count)
    }

    pub async fn last_synced_at(&self, session_id: &str) -> Result<Option<DateTime<Utc>>> {
        let row: Option<Option<NaiveDateTime>> =
            sqlx::query_scalar("SELECT last_synced_at FROM sessions WHERE session_id = ?")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.flatten().map(|naive| Utc.from_utc_datetime(&naive)))
    }
}
