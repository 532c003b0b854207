//! PostgreSQL implementation of the entry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Entry;
use crate::domain::repositories::{EntryRepository, RepositoryError};

/// Row shape shared by every query returning a full entry.
#[derive(sqlx::FromRow)]
struct EntryRow {
    short_code: String,
    original_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry::new(row.short_code, row.original_url, row.clicks, row.created_at)
    }
}

/// PostgreSQL repository for entries.
///
/// Uses bound parameters for every query. The `entries.short_code` unique
/// constraint backs the insert-if-absent contract, so concurrent inserts of
/// the same code leave exactly one row.
pub struct PgEntryRepository {
    pool: Arc<PgPool>,
}

impl PgEntryRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn insert_if_absent(&self, entry: &Entry) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO entries (short_code, original_url, clicks, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (short_code) DO NOTHING
            "#,
        )
        .bind(&entry.short_code)
        .bind(&entry.original_url)
        .bind(entry.clicks)
        .bind(entry.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Entry>, RepositoryError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT short_code, original_url, clicks, created_at
            FROM entries
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Entry::from))
    }

    async fn find_stats_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<(i64, DateTime<Utc>)>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            "SELECT clicks, created_at FROM entries WHERE short_code = $1",
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<Option<Entry>, RepositoryError> {
        let row = sqlx::query_as::<_, EntryRow>(
            r#"
            UPDATE entries
            SET clicks = clicks + 1
            WHERE short_code = $1
            RETURNING short_code, original_url, clicks, created_at
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Entry::from))
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
