// src/adapter/enrichment.rs

//! Client adapter for an external enrichment service: long-term memory
//! lookups over HTTP. Read-oriented: it only ever contributes to context
//! fetches, never receives writes.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::{AdapterContext, ContextItem, ExecutionResult, MemoryAdapter};
use crate::config::EnrichmentConfig;
use crate::intent::{IntentKind, MemoryIntent, MemoryOp};

/// Hits requested when the caller doesn't bound the fetch.
const DEFAULT_SEARCH_LIMIT: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    session_id: &'a str,
    user_id: &'a str,
    limit: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    text: String,
    #[serde(default)]
    score: f32,
}

pub struct EnrichmentAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EnrichmentAdapter {
    /// Build from config. Returns `Ok(None)` when no API key is configured;
    /// enrichment simply stays out of the adapter list in that case.
    pub fn from_config(config: &EnrichmentConfig) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        }))
    }

    async fn search(
        &self,
        intent: &MemoryIntent,
        limit: usize,
    ) -> Result<Vec<ContextItem>, EnrichmentError> {
        let url = format!("{}/v1/memories/search", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SearchRequest {
                session_id: &intent.session_id,
                user_id: &intent.user_id,
                limit,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        debug!("Enrichment returned {} hits", body.results.len());

        Ok(body
            .results
            .into_iter()
            .map(|hit| ContextItem {
                text: hit.text,
                score: hit.score,
                source: "enrichment".to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl MemoryAdapter for EnrichmentAdapter {
    fn id(&self) -> &str {
        "enrichment"
    }

    fn supported_intents(&self) -> &[IntentKind] {
        &[IntentKind::FetchContext]
    }

    async fn handle(
        &self,
        intent: &MemoryIntent,
        _ctx: &AdapterContext,
    ) -> anyhow::Result<ExecutionResult> {
        let MemoryOp::FetchContext { limit } = &intent.op else {
            // Dispatch filters on supported kinds; anything else is a skip.
            return Ok(ExecutionResult::skipped());
        };

        match self.search(intent, limit.unwrap_or(DEFAULT_SEARCH_LIMIT)).await {
            Ok(items) => Ok(ExecutionResult::ok_with_context(items)),
            Err(err) => Ok(ExecutionResult::error(err.to_string())),
        }
    }
}
