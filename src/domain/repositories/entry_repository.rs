//! Repository trait for durable entry storage.

use crate::domain::entities::Entry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Errors raised by the durable store.
///
/// A key conflict on insert is not an error; see
/// [`EntryRepository::insert_if_absent`].
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("durable store unavailable: {0}")]
    Unavailable(String),
}

/// Durable, authoritative storage for entries.
///
/// `short_code` is a unique key. Entries are never deleted, and only the
/// click counter is ever updated.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEntryRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Inserts the entry unless a row with the same short code exists.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the row was inserted
    /// - `Ok(false)` if the short code was already taken (the stored row is left untouched)
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the store is unreachable or fails.
    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, RepositoryError>;

    /// Finds an entry by its short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Entry>, RepositoryError>;

    /// Returns `(clicks, created_at)` for a short code.
    async fn find_stats_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<(i64, DateTime<Utc>)>, RepositoryError>;

    /// Atomically adds one click and returns the updated entry.
    ///
    /// Returns `Ok(None)` if no entry has this short code.
    async fn increment_clicks(&self, short_code: &str) -> Result<Option<Entry>, RepositoryError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
