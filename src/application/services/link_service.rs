//! Link creation, resolution and statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::application::errors::{CreationError, LinkError};
use crate::application::services::entry_store::{PutOutcome, TieredEntryStore};
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Entry;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Typed input of [`LinkService::create_link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLink {
    pub url: String,
    /// Used verbatim as the short code when present and non-empty.
    pub custom_alias: Option<String>,
}

impl CreateLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            custom_alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.custom_alias = Some(alias.into());
        self
    }
}

/// A resolved link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl From<Entry> for LinkRecord {
    fn from(entry: Entry) -> Self {
        Self {
            url: entry.original_url,
            short_code: entry.short_code,
            created_at: entry.created_at,
            clicks: entry.clicks,
        }
    }
}

/// Access statistics of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub short_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub approximate_size: usize,
}

/// Entry point of the link core, called by the transport layer.
///
/// Concurrent calls share nothing but the store's connections. Two creations
/// that resolve to the same code are not coordinated here; the durable
/// store's insert-if-absent decides which URL persists.
pub struct LinkService {
    store: Arc<TieredEntryStore>,
    generator: CodeGenerator,
    click_sender: Option<mpsc::Sender<ClickEvent>>,
}

impl LinkService {
    /// Creates a link service without click tracking.
    pub fn new(store: Arc<TieredEntryStore>, generator: CodeGenerator) -> Self {
        Self {
            store,
            generator,
            click_sender: None,
        }
    }

    /// Enables click tracking: every resolution queues a [`ClickEvent`].
    pub fn with_click_sender(mut self, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        self.click_sender = Some(click_sender);
        self
    }

    /// Creates a short link and returns its code.
    ///
    /// The code is the custom alias when one is given, otherwise a code
    /// generated from the URL. The entry starts with zero clicks.
    ///
    /// If the code already belongs to another entry, the existing durable
    /// entry is kept and the code is still returned without error.
    ///
    /// # Errors
    ///
    /// - [`LinkError::InvalidInput`] if the URL is missing or not a valid HTTP(S) URL
    /// - [`LinkError::CreationFailed`] on randomness, cache or durable store failure
    pub async fn create_link(&self, request: CreateLink) -> Result<String, LinkError> {
        validate_url(&request.url).map_err(|e| LinkError::InvalidInput(e.to_string()))?;

        let code = self
            .generator
            .resolve(&request.url, request.custom_alias.as_deref())
            .map_err(CreationError::from)?;

        let entry = Entry::new(code, request.url, 0, Utc::now());

        match self.store.put(&entry).await {
            Ok(PutOutcome::Inserted) => {
                info!("Created short link {} -> {}", entry.short_code, entry.original_url);
            }
            Ok(PutOutcome::AlreadyExists) => {
                counter!("link_create_conflicts_total").increment(1);
            }
            Err(e) => {
                error!("Failed to create short link {}: {}", entry.short_code, e);
                return Err(CreationError::from(e).into());
            }
        }

        Ok(entry.short_code)
    }

    /// Resolves a short code to its link record.
    ///
    /// # Errors
    ///
    /// - [`LinkError::LinkNotFound`] if neither tier has the code
    /// - [`LinkError::DurableStoreFailure`] if the durable store fails on a cache miss
    pub async fn resolve_link(&self, code: &str) -> Result<LinkRecord, LinkError> {
        let entry = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| LinkError::LinkNotFound(code.to_string()))?;

        self.record_click(code);

        Ok(LinkRecord::from(entry))
    }

    /// Returns the statistics of a short code.
    ///
    /// # Errors
    ///
    /// - [`LinkError::LinkNotFound`] if neither tier has the code, or the
    ///   durable store reports zero clicks at the Unix epoch
    /// - [`LinkError::DurableStoreFailure`] if the durable store fails on a cache miss
    pub async fn get_stats(&self, code: &str) -> Result<LinkStats, LinkError> {
        let stats = self
            .store
            .get_stats(code)
            .await?
            .filter(|stats| !stats.is_degenerate())
            .ok_or_else(|| LinkError::LinkNotFound(code.to_string()))?;

        Ok(LinkStats {
            short_code: code.to_string(),
            clicks: stats.clicks,
            created_at: stats.created_at,
            approximate_size: stats.approximate_size,
        })
    }

    /// Whether resolutions are counted.
    pub fn click_tracking_enabled(&self) -> bool {
        self.click_sender.is_some()
    }

    /// Queues a click without waiting; drops it if the queue is full.
    fn record_click(&self, code: &str) {
        let Some(sender) = &self.click_sender else {
            return;
        };

        if let Err(e) = sender.try_send(ClickEvent::new(code)) {
            debug!("Dropping click for {}: {}", code, e);
            counter!("click_events_dropped_total").increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockEntryRepository, RepositoryError};
    use crate::infrastructure::cache::{CacheError, CacheService, MemoryCache, MockCacheService};
    use crate::utils::code_generator::{CodeGenError, EntropySource};

    struct ZeroEntropy;

    impl EntropySource for ZeroEntropy {
        fn fill(&self, buf: &mut [u8]) -> Result<(), CodeGenError> {
            buf.fill(0);
            Ok(())
        }
    }

    struct NoEntropy;

    impl EntropySource for NoEntropy {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), CodeGenError> {
            Err(CodeGenError::RandomnessUnavailable("getrandom failed".to_string()))
        }
    }

    fn service_with(
        cache: Arc<dyn CacheService>,
        repo: MockEntryRepository,
        generator: CodeGenerator,
    ) -> LinkService {
        let store = TieredEntryStore::new(cache, Arc::new(repo));
        LinkService::new(Arc::new(store), generator)
    }

    fn zero_generator() -> CodeGenerator {
        CodeGenerator::new(Arc::new(ZeroEntropy))
    }

    #[tokio::test]
    async fn test_create_link_generates_code() {
        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent()
            .withf(|e| {
                e.short_code == "3EAJyP" && e.original_url == "https://example.com" && e.clicks == 0
            })
            .times(1)
            .returning(|_| Ok(true));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let code = service
            .create_link(CreateLink::new("https://example.com"))
            .await
            .unwrap();

        assert_eq!(code, "3EAJyP");
    }

    #[tokio::test]
    async fn test_create_link_with_custom_alias() {
        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent()
            .withf(|e| e.short_code == "my-alias")
            .times(1)
            .returning(|_| Ok(true));

        let service = service_with(
            Arc::new(MemoryCache::new(100)),
            repo,
            CodeGenerator::new(Arc::new(NoEntropy)),
        );
        let code = service
            .create_link(CreateLink::new("https://example.com").with_alias("my-alias"))
            .await
            .unwrap();

        assert_eq!(code, "my-alias");
    }

    #[tokio::test]
    async fn test_create_link_invalid_url() {
        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent().times(0);

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());

        for url in ["", "not-a-url", "javascript:alert(1)"] {
            let result = service.create_link(CreateLink::new(url)).await;
            assert!(
                matches!(result, Err(LinkError::InvalidInput(_))),
                "{url:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_link_randomness_unavailable() {
        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent().times(0);

        let service = service_with(
            Arc::new(MemoryCache::new(100)),
            repo,
            CodeGenerator::new(Arc::new(NoEntropy)),
        );
        let result = service.create_link(CreateLink::new("https://example.com")).await;

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            LinkError::CreationFailed(CreationError::RandomnessUnavailable(_))
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_create_link_cache_write_failure() {
        let mut cache = MockCacheService::new();
        cache
            .expect_set()
            .times(1)
            .returning(|_, _, _| Err(CacheError::ConnectionError("refused".to_string())));

        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent().times(0);

        let service = service_with(Arc::new(cache), repo, zero_generator());
        let result = service.create_link(CreateLink::new("https://example.com")).await;

        assert!(matches!(
            result,
            Err(LinkError::CreationFailed(CreationError::CacheWriteFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_link_durable_failure() {
        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(RepositoryError::Unavailable("pool timed out".to_string())));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let result = service.create_link(CreateLink::new("https://example.com")).await;

        assert!(matches!(
            result,
            Err(LinkError::CreationFailed(CreationError::DurableStoreFailure(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_link_conflict_still_returns_code() {
        let mut repo = MockEntryRepository::new();
        repo.expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(false));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let code = service
            .create_link(CreateLink::new("https://example.com").with_alias("taken"))
            .await
            .unwrap();

        assert_eq!(code, "taken");
    }

    #[tokio::test]
    async fn test_resolve_link_record_shape() {
        let created_at = Utc::now();
        let mut repo = MockEntryRepository::new();
        repo.expect_find_by_code().times(1).returning(move |code| {
            Ok(Some(Entry::new(
                code.to_string(),
                "https://example.com".to_string(),
                2,
                created_at,
            )))
        });

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let record = service.resolve_link("abc123").await.unwrap();

        assert_eq!(
            record,
            LinkRecord {
                url: "https://example.com".to_string(),
                short_code: "abc123".to_string(),
                created_at,
                clicks: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_link_not_found() {
        let mut repo = MockEntryRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let result = service.resolve_link("nonexistent").await;

        assert!(matches!(result, Err(LinkError::LinkNotFound(code)) if code == "nonexistent"));
    }

    #[tokio::test]
    async fn test_resolve_link_durable_failure() {
        let mut repo = MockEntryRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let result = service.resolve_link("abc123").await;

        assert!(matches!(result, Err(LinkError::DurableStoreFailure(_))));
    }

    #[tokio::test]
    async fn test_resolve_link_queues_click() {
        let mut repo = MockEntryRepository::new();
        repo.expect_find_by_code().times(1).returning(|code| {
            Ok(Some(Entry::new(
                code.to_string(),
                "https://example.com".to_string(),
                0,
                Utc::now(),
            )))
        });

        let (tx, mut rx) = mpsc::channel(10);
        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator())
            .with_click_sender(tx);

        assert!(service.click_tracking_enabled());
        service.resolve_link("abc123").await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), ClickEvent::new("abc123"));
    }

    #[tokio::test]
    async fn test_resolve_link_full_click_queue_does_not_fail() {
        let mut repo = MockEntryRepository::new();
        repo.expect_find_by_code().returning(|code| {
            Ok(Some(Entry::new(
                code.to_string(),
                "https://example.com".to_string(),
                0,
                Utc::now(),
            )))
        });

        let (tx, mut rx) = mpsc::channel(1);
        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator())
            .with_click_sender(tx);

        service.resolve_link("abc123").await.unwrap();
        service.resolve_link("abc123").await.unwrap();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_get_stats_success() {
        let created_at = Utc::now();
        let mut repo = MockEntryRepository::new();
        repo.expect_find_stats_by_code()
            .times(1)
            .returning(move |_| Ok(Some((3, created_at))));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());
        let stats = service.get_stats("abc123").await.unwrap();

        assert_eq!(stats.short_code, "abc123");
        assert_eq!(stats.clicks, 3);
        assert_eq!(stats.created_at, created_at);
        assert_eq!(stats.approximate_size, 6);
    }

    #[tokio::test]
    async fn test_get_stats_not_found() {
        let mut repo = MockEntryRepository::new();
        repo.expect_find_stats_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());

        assert!(matches!(
            service.get_stats("missing").await,
            Err(LinkError::LinkNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_stats_degenerate_row_is_not_found() {
        let mut repo = MockEntryRepository::new();
        repo.expect_find_stats_by_code()
            .times(1)
            .returning(|_| Ok(Some((0, DateTime::<Utc>::UNIX_EPOCH))));

        let service = service_with(Arc::new(MemoryCache::new(100)), repo, zero_generator());

        assert!(matches!(
            service.get_stats("ghost").await,
            Err(LinkError::LinkNotFound(_))
        ));
    }
}
