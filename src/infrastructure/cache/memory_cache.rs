//! In-process cache backed by `moka`, with a TTL per entry.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::policy::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cached value together with the TTL it was written with.
#[derive(Clone)]
struct TimedValue {
    value: String,
    ttl: Duration,
}

/// Expires each value after the TTL passed to [`CacheService::set`].
struct PerEntryExpiry;

impl Expiry<String, TimedValue> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &TimedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &TimedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // An overwrite restarts the retention window.
        Some(value.ttl)
    }
}

/// Bounded in-process cache.
///
/// Used when Redis is not configured and by integration tests. Entries are
/// not shared between processes.
pub struct MemoryCache {
    inner: Cache<String, TimedValue>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!("MemoryCache initialized with max capacity: {}", max_capacity);
        Self { inner }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.inner.get(key).await.map(|timed| timed.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.inner
            .insert(
                key.to_string(),
                TimedValue {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
