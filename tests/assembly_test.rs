// tests/assembly_test.rs

//! Default assembly: ordering, enrichment gating, and an end-to-end pass
//! through the assembled adapters.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use memrelay::adapter::cache::RecentCacheAdapter;
use memrelay::adapter::registry::build_default_adapters;
use memrelay::adapter::{AdapterContext, AdapterRole, ExecutionStatus, MemoryAdapter};
use memrelay::config::MemoryConfig;
use memrelay::intent::{ConversationTurn, MemoryIntent};
use memrelay::orchestrator::{OrchestrationStatus, orchestrate};
use memrelay::redact::REDACTION_MARKER;
use memrelay::storage::TurnStore;

async fn setup_store() -> (Arc<TurnStore>, String) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool.");

    let store = TurnStore::new(pool);
    store.run_migrations().await.unwrap();

    let session_id = format!("test_session_{}", Uuid::new_v4());
    (Arc::new(store), session_id)
}

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_enrichment_is_omitted_without_a_key() {
    let (store, _) = setup_store().await;
    let config = MemoryConfig::default();

    let adapters = build_default_adapters(&config, store).unwrap();

    let ids: Vec<&str> = adapters.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["sqlite", "cache"]);
}

#[tokio::test]
async fn test_enrichment_is_appended_last_with_a_key() {
    let (store, _) = setup_store().await;
    let mut config = MemoryConfig::default();
    config.enrichment.api_key = Some("test-key".to_string());

    let adapters = build_default_adapters(&config, store).unwrap();

    let ids: Vec<&str> = adapters.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["sqlite", "cache", "enrichment"]);

    // Exactly one canonical adapter, and it comes first.
    assert_eq!(adapters[0].role(), AdapterRole::Canonical);
    assert!(
        adapters[1..]
            .iter()
            .all(|a| a.role() == AdapterRole::Secondary)
    );
}

// ============================================================================
// Cache adapter
// ============================================================================

#[tokio::test]
async fn test_cache_trims_to_capacity_and_serves_fetch() {
    let (store, session_id) = setup_store().await;
    let cache = RecentCacheAdapter::new(store, 2);
    let ctx = AdapterContext::new();

    for content in ["one", "two", "three"] {
        let intent = MemoryIntent::turn_committed(
            session_id.clone(),
            "u1",
            ConversationTurn::new("user", content),
        );
        cache.handle(&intent, &ctx).await.unwrap();
    }

    assert_eq!(cache.cached_len(&session_id).await, 2);

    let fetch = MemoryIntent::fetch_context(session_id.clone(), "u1", None);
    let result = cache.handle(&fetch, &ctx).await.unwrap();

    let texts: Vec<&str> = result.context_items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["two", "three"]);
}

#[tokio::test]
async fn test_cache_sync_invalidates_session() {
    let (store, session_id) = setup_store().await;
    let cache = RecentCacheAdapter::new(store, 8);
    let ctx = AdapterContext::new();

    let commit = MemoryIntent::turn_committed(
        session_id.clone(),
        "u1",
        ConversationTurn::new("user", "hello"),
    );
    cache.handle(&commit, &ctx).await.unwrap();
    assert_eq!(cache.cached_len(&session_id).await, 1);

    let sync = MemoryIntent::sync_session(session_id.clone(), "u1");
    cache.handle(&sync, &ctx).await.unwrap();
    assert_eq!(cache.cached_len(&session_id).await, 0);
}

#[tokio::test]
async fn test_cache_backfills_from_the_canonical_store() {
    let (store, session_id) = setup_store().await;

    for i in 0..3 {
        store
            .save_turn(
                &session_id,
                "u1",
                &ConversationTurn::new("user", format!("stored {i}")),
            )
            .await
            .unwrap();
    }

    let cache = RecentCacheAdapter::new(Arc::clone(&store), 8);
    let ctx = AdapterContext::new();
    assert_eq!(cache.cached_len(&session_id).await, 0);

    let backfill = MemoryIntent::backfill_session(session_id.clone(), "u1");
    let result = cache.handle(&backfill, &ctx).await.unwrap();

    assert_eq!(result.status, ExecutionStatus::Ok);
    assert_eq!(cache.cached_len(&session_id).await, 3);
}

#[tokio::test]
async fn test_cold_cache_fetch_contributes_nothing() {
    let (store, session_id) = setup_store().await;
    let cache = RecentCacheAdapter::new(store, 8);
    let ctx = AdapterContext::new();

    let fetch = MemoryIntent::fetch_context(session_id, "u1", Some(5));
    let result = cache.handle(&fetch, &ctx).await.unwrap();

    assert_eq!(result.status, ExecutionStatus::Ok);
    assert!(result.context_items.is_empty());
}

// ============================================================================
// End to end through the default assembly
// ============================================================================

#[tokio::test]
async fn test_commit_with_pii_then_fetch_merges_both_views() {
    let (store, session_id) = setup_store().await;
    let adapters = build_default_adapters(&MemoryConfig::default(), Arc::clone(&store)).unwrap();
    let ctx = AdapterContext::new();

    let commit = MemoryIntent::turn_committed(
        session_id.clone(),
        "u1",
        ConversationTurn::new("user", "my card is 4111 1111 1111 1111"),
    );
    let result = orchestrate(Arc::new(commit), &adapters, &ctx).await;
    assert_eq!(result.status, OrchestrationStatus::Ok);

    // The canonical store kept the raw content.
    let stored = store.load_recent(&session_id, 10).await.unwrap();
    assert!(stored[0].turn.content.contains("4111"));

    let fetch = MemoryIntent::fetch_context(session_id.clone(), "u1", Some(10));
    let result = orchestrate(Arc::new(fetch), &adapters, &ctx).await;

    assert_eq!(result.status, OrchestrationStatus::Ok);
    let context = result.context.expect("both adapters answered");

    let canonical_view = context.iter().find(|i| i.source == "sqlite").unwrap();
    let cache_view = context.iter().find(|i| i.source == "cache").unwrap();

    // Full fidelity inside the canonical boundary, scrubbed outside it.
    assert!(canonical_view.text.contains("4111"));
    assert!(cache_view.text.contains(REDACTION_MARKER));
    assert!(!cache_view.text.contains("4111"));
}
