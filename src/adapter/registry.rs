// src/adapter/registry.rs

//! Default adapter assembly.
//!
//! Order is a design invariant: the canonical write is attempted before any
//! mirror, and enrichment comes last because it is advisory context, not
//! authoritative state.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::adapter::MemoryAdapter;
use crate::adapter::cache::RecentCacheAdapter;
use crate::adapter::canonical::CanonicalStoreAdapter;
use crate::adapter::enrichment::EnrichmentAdapter;
use crate::config::MemoryConfig;
use crate::storage::TurnStore;

/// Assemble the default adapter list for a configuration: canonical store,
/// cache, then enrichment. Enrichment is included only when its API key is
/// present; an absent key is a valid state, not an error.
pub fn build_default_adapters(
    config: &MemoryConfig,
    store: Arc<TurnStore>,
) -> Result<Vec<Arc<dyn MemoryAdapter>>> {
    let mut adapters: Vec<Arc<dyn MemoryAdapter>> = vec![
        Arc::new(CanonicalStoreAdapter::new(Arc::clone(&store))),
        Arc::new(RecentCacheAdapter::new(
            store,
            config.cache.capacity_per_session,
        )),
    ];

    match EnrichmentAdapter::from_config(&config.enrichment)? {
        Some(enrichment) => {
            info!("Enrichment adapter enabled ({})", config.enrichment.base_url);
            adapters.push(Arc::new(enrichment));
        }
        None => {
            info!("Enrichment adapter disabled - no API key configured");
        }
    }

    Ok(adapters)
}
