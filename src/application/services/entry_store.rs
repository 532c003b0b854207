//! Two-tier entry storage: a volatile cache in front of the durable store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use crate::application::errors::StoreError;
use crate::domain::entities::{Entry, EntryStats};
use crate::domain::repositories::{EntryRepository, RepositoryError};
use crate::infrastructure::cache::{CacheError, CacheService};

/// Retention window of cached entries.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How the create path treats the cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// Cache first, then durable. A cache failure aborts creation.
    #[default]
    Required,
    /// Durable first. A cache failure is logged and ignored.
    BestEffort,
}

impl FromStr for CacheWritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(format!(
                "unknown cache write policy '{}', expected 'required' or 'best_effort'",
                other
            )),
        }
    }
}

impl fmt::Display for CacheWritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::BestEffort => f.write_str("best_effort"),
        }
    }
}

/// Result of [`TieredEntryStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The entry is now the durable row for its code.
    Inserted,
    /// Another entry already owned the code; the durable row was left as is.
    AlreadyExists,
}

/// Keeps the cache and the durable store coherent.
///
/// The durable store is authoritative. The cache holds JSON copies of
/// entries for [`DEFAULT_CACHE_TTL`] unless configured otherwise, and may
/// briefly disagree with the durable copy.
///
/// # Read path
///
/// Cache probe, then durable lookup on miss, then cache repopulation. Cache
/// errors and undecodable cache values count as misses. Durable errors are
/// returned.
///
/// # Write path
///
/// See [`CacheWritePolicy`]. The durable insert is insert-if-absent, so on a
/// code collision the first writer's URL persists.
pub struct TieredEntryStore {
    cache: Arc<dyn CacheService>,
    repository: Arc<dyn EntryRepository>,
    ttl: Duration,
    write_policy: CacheWritePolicy,
}

impl TieredEntryStore {
    /// Creates a store with the default TTL and the `Required` write policy.
    pub fn new(cache: Arc<dyn CacheService>, repository: Arc<dyn EntryRepository>) -> Self {
        Self {
            cache,
            repository,
            ttl: DEFAULT_CACHE_TTL,
            write_policy: CacheWritePolicy::default(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_write_policy(mut self, write_policy: CacheWritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn write_policy(&self) -> CacheWritePolicy {
        self.write_policy
    }

    /// Writes a new entry to both tiers.
    ///
    /// On [`PutOutcome::AlreadyExists`] the cache is left without the new
    /// value, so later reads see the durable row.
    ///
    /// # Errors
    ///
    /// - [`StoreError::CacheWriteFailed`] if the cache write fails under
    ///   [`CacheWritePolicy::Required`]; the durable store is not touched
    /// - [`StoreError::DurableStoreFailure`] if the durable insert fails
    pub async fn put(&self, entry: &Entry) -> Result<PutOutcome, StoreError> {
        match self.write_policy {
            CacheWritePolicy::Required => {
                self.write_cache(entry)
                    .await
                    .map_err(StoreError::CacheWriteFailed)?;

                let inserted = self
                    .repository
                    .insert_if_absent(entry)
                    .await
                    .map_err(StoreError::DurableStoreFailure)?;

                if !inserted {
                    self.report_conflict(entry);
                    if let Err(e) = self.cache.invalidate(&entry.short_code).await {
                        warn!(
                            "Failed to drop conflicting cache value for {}: {}",
                            entry.short_code, e
                        );
                    }
                    return Ok(PutOutcome::AlreadyExists);
                }

                Ok(PutOutcome::Inserted)
            }
            CacheWritePolicy::BestEffort => {
                let inserted = self
                    .repository
                    .insert_if_absent(entry)
                    .await
                    .map_err(StoreError::DurableStoreFailure)?;

                if !inserted {
                    self.report_conflict(entry);
                    return Ok(PutOutcome::AlreadyExists);
                }

                if let Err(e) = self.write_cache(entry).await {
                    warn!(
                        "Entry {} persisted but not cached: {}",
                        entry.short_code, e
                    );
                }

                Ok(PutOutcome::Inserted)
            }
        }
    }

    /// Looks up an entry, cache first.
    ///
    /// A durable hit is written back to the cache before returning.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the durable store fails on a cache miss.
    pub async fn get(&self, code: &str) -> Result<Option<Entry>, RepositoryError> {
        if let Some((entry, _)) = self.probe_cache(code).await {
            return Ok(Some(entry));
        }

        let Some(entry) = self.repository.find_by_code(code).await? else {
            debug!("Entry {} not found in durable store", code);
            return Ok(None);
        };

        self.refresh_cache(&entry).await;
        counter!("entry_cache_repopulations_total").increment(1);

        Ok(Some(entry))
    }

    /// Looks up the statistics projection of an entry, cache first.
    ///
    /// The durable fallback does not repopulate the cache.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the durable store fails on a cache miss.
    pub async fn get_stats(&self, code: &str) -> Result<Option<EntryStats>, RepositoryError> {
        if let Some((entry, size)) = self.probe_cache(code).await {
            return Ok(Some(EntryStats {
                clicks: entry.clicks,
                created_at: entry.created_at,
                approximate_size: size,
            }));
        }

        let stats = self
            .repository
            .find_stats_by_code(code)
            .await?
            .map(|(clicks, created_at)| EntryStats {
                clicks,
                created_at,
                approximate_size: code.len(),
            });

        Ok(stats)
    }

    /// Counts one click in the durable store and refreshes the cached copy.
    ///
    /// Returns `Ok(None)` if the code has no durable entry.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the durable update fails.
    pub async fn record_click(&self, code: &str) -> Result<Option<Entry>, RepositoryError> {
        let updated = self.repository.increment_clicks(code).await?;

        if let Some(entry) = &updated {
            self.refresh_cache(entry).await;
        }

        Ok(updated)
    }

    /// Writes `entry` to the cache, logging instead of failing.
    pub async fn refresh_cache(&self, entry: &Entry) {
        if let Err(e) = self.write_cache(entry).await {
            warn!("Failed to cache entry {}: {}", entry.short_code, e);
        }
    }

    async fn write_cache(&self, entry: &Entry) -> Result<(), CacheError> {
        let value = entry
            .to_cache_value()
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;

        self.cache.set(&entry.short_code, &value, self.ttl).await
    }

    /// Returns the cached entry and the byte length of its cached value.
    async fn probe_cache(&self, code: &str) -> Option<(Entry, usize)> {
        let value = match self.cache.get(code).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("Cache MISS: {}", code);
                counter!("entry_cache_misses_total").increment(1);
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for {}, using durable store: {}", code, e);
                counter!("entry_cache_misses_total").increment(1);
                return None;
            }
        };

        match Entry::from_cache_value(&value) {
            Ok(entry) if entry.short_code == code => {
                debug!("Cache HIT: {}", code);
                counter!("entry_cache_hits_total").increment(1);
                Some((entry, value.len()))
            }
            Ok(entry) => {
                warn!(
                    "Cached value for {} belongs to {}, ignoring",
                    code, entry.short_code
                );
                counter!("entry_cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!("Undecodable cache value for {}: {}", code, e);
                counter!("entry_cache_misses_total").increment(1);
                None
            }
        }
    }

    fn report_conflict(&self, entry: &Entry) {
        warn!(
            "Short code {} already taken; durable store keeps the existing URL, {} was not stored",
            entry.short_code, entry.original_url
        );
        counter!("entry_code_conflicts_total").increment(1);
    }
}
