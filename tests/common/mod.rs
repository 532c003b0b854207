#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tiered_shortener::application::services::{LinkService, TieredEntryStore};
use tiered_shortener::domain::click_event::ClickEvent;
use tiered_shortener::domain::entities::Entry;
use tiered_shortener::domain::repositories::{EntryRepository, RepositoryError};
use tiered_shortener::infrastructure::cache::{CacheService, MemoryCache};
use tiered_shortener::state::AppState;
use tiered_shortener::utils::code_generator::CodeGenerator;

/// Durable store kept in a map, with a switch to simulate an outage.
#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: Mutex<HashMap<String, Entry>>,
    down: AtomicBool,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn stored(&self, code: &str) -> Option<Entry> {
        self.entries.lock().unwrap().get(code).cloned()
    }

    pub fn seed(&self, entry: Entry) {
        self.entries
            .lock()
            .unwrap()
            .insert(entry.short_code.clone(), entry);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.down.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(&entry.short_code) {
            return Ok(false);
        }
        entries.insert(entry.short_code.clone(), entry.clone());
        Ok(true)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Entry>, RepositoryError> {
        self.check()?;
        Ok(self.stored(short_code))
    }

    async fn find_stats_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<(i64, DateTime<Utc>)>, RepositoryError> {
        self.check()?;
        Ok(self.stored(short_code).map(|e| (e.clicks, e.created_at)))
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<Option<Entry>, RepositoryError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        Ok(entries.get_mut(short_code).map(|entry| {
            entry.clicks += 1;
            entry.clone()
        }))
    }

    async fn health_check(&self) -> bool {
        !self.down.load(Ordering::SeqCst)
    }
}

/// Everything a test may want to inspect behind an [`AppState`].
pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<InMemoryEntryRepository>,
    pub cache: Arc<MemoryCache>,
    pub store: Arc<TieredEntryStore>,
    pub click_rx: Option<mpsc::Receiver<ClickEvent>>,
}

pub fn create_test_context(click_tracking: bool) -> TestContext {
    let repository = Arc::new(InMemoryEntryRepository::new());
    let cache = Arc::new(MemoryCache::new(1_000));
    let store = Arc::new(TieredEntryStore::new(cache.clone(), repository.clone()));

    let mut link_service = LinkService::new(store.clone(), CodeGenerator::default());
    let (click_sender, click_rx) = if click_tracking {
        let (tx, rx) = mpsc::channel(100);
        link_service = link_service.with_click_sender(tx.clone());
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let state = AppState {
        link_service: Arc::new(link_service),
        cache: cache.clone() as Arc<dyn CacheService>,
        repository: repository.clone() as Arc<dyn EntryRepository>,
        click_sender,
    };

    TestContext {
        state,
        repository,
        cache,
        store,
        click_rx,
    }
}

pub fn entry(code: &str, url: &str, clicks: i64) -> Entry {
    Entry::new(code.to_string(), url.to_string(), clicks, Utc::now())
}
