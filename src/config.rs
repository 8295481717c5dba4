// src/config.rs

//! Environment-driven configuration for the default adapter assembly.
//!
//! Defaults are usable out of the box; `from_env` overrides field by field.
//! Assembly stays a pure function of the resulting struct; nothing in here
//! registers anything globally.

/// Canonical store settings.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Connection string for the canonical turn store.
    pub database_url: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:memrelay.db?mode=rwc".to_string(),
        }
    }
}

/// In-process recent-turn cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Turns retained per session.
    pub capacity_per_session: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity_per_session: 64,
        }
    }
}

/// Enrichment service settings. The adapter is only assembled when an API
/// key is present.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Base URL of the enrichment service.
    pub base_url: String,
    /// API key; absence disables enrichment entirely (not an error).
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8450".to_string(),
            api_key: None,
            timeout_ms: 2_000,
        }
    }
}

/// Top-level configuration for the memory layer.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    pub sqlite: SqliteConfig,
    pub cache: CacheConfig,
    pub enrichment: EnrichmentConfig,
}

impl MemoryConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MEMRELAY_DATABASE_URL") {
            config.sqlite.database_url = val;
        }
        if let Ok(val) = std::env::var("MEMRELAY_CACHE_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                config.cache.capacity_per_session = capacity;
            }
        }
        if let Ok(val) = std::env::var("MEMRELAY_ENRICHMENT_URL") {
            config.enrichment.base_url = val;
        }
        if let Ok(val) = std::env::var("MEMRELAY_ENRICHMENT_API_KEY") {
            if !val.is_empty() {
                config.enrichment.api_key = Some(val);
            }
        }
        if let Ok(val) = std::env::var("MEMRELAY_ENRICHMENT_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                config.enrichment.timeout_ms = ms;
            }
        }

        config
    }
}

/// Load `.env` once at the application edge. A missing file is fine.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_enrichment_key() {
        let config = MemoryConfig::default();
        assert!(config.enrichment.api_key.is_none());
        assert!(config.cache.capacity_per_session > 0);
    }
}
