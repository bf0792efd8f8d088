//! Cache layer for composed responses.
//!
//! Responses are stored as JSON text under `featured-content-{lang}-{date}`
//! with a TTL. Redis backs production deployments; `memory://` selects a
//! process-local store for development and tests.

use crate::feed_date::FeedDate;
use crate::i18n::Language;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::info;

/// Default time-to-live of a cached response (30 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 1800;

/// Longest accepted time-to-live (one week).
pub const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

const MEMORY_SCHEME: &str = "memory://";

/// Key/value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}

/// Both stores accept TTLs in `1..=MAX_CACHE_TTL_SECS`. Redis rejects a zero
/// expiry, so the in-memory store does too.
pub fn ensure_ttl(ttl_secs: u64) -> Result<()> {
    if (1..=MAX_CACHE_TTL_SECS).contains(&ttl_secs) {
        Ok(())
    } else {
        anyhow::bail!(
            "Cache TTL must be between 1 and {} seconds, got {}",
            MAX_CACHE_TTL_SECS,
            ttl_secs
        )
    }
}

/// Cache key for one (language, date) response.
pub fn cache_key(language: Language, date: FeedDate) -> String {
    format!("featured-content-{}-{}", language.code(), date.iso())
}

/// Read and decode a JSON value. An undecodable entry is reported as an error.
pub async fn get_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Cached entry '{}' is not valid JSON", key))?;
    Ok(Some(value))
}

pub async fn set_json<T: Serialize>(
    store: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl_secs: u64,
) -> Result<()> {
    let raw = serde_json::to_string(value).context("Failed to serialize cache entry")?;
    store.set(key, &raw, ttl_secs).await
}

/// Connect to the store named by `url`.
pub async fn connect_cache(url: &str) -> Result<Arc<dyn CacheStore>> {
    if url.starts_with(MEMORY_SCHEME) {
        info!("Using in-memory cache");
        return Ok(Arc::new(MemoryCache::new()));
    }

    let cache = RedisCache::connect(url).await?;
    info!("Connected to Redis cache");
    Ok(Arc::new(cache))
}

// ==================== Redis ====================

pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("Invalid CACHE_URL")?;
        let connection = client
            .get_connection_manager()
            .await
            .context("Failed to connect to Redis")?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut connection = self.connection.clone();
        let value = connection
            .get::<_, Option<String>>(key)
            .await
            .with_context(|| format!("Redis GET {} failed", key))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        ensure_ttl(ttl_secs)?;
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .with_context(|| format!("Redis SET {} failed", key))?;
        Ok(())
    }
}

// ==================== In-memory ====================

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("In-memory cache lock poisoned"))
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        ensure_ttl(ttl_secs)?;
        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(ttl_secs))
            .context("Cache TTL overflows the clock")?;
        self.lock()?
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }
}
