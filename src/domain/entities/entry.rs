//! Entry entity: the durable and cacheable unit of a short link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code and the URL it resolves to.
///
/// `short_code` and `original_url` never change after creation. `clicks` only
/// grows. The serialized form is the value stored in the volatile cache:
///
/// ```json
/// {"url":"https://example.com","shortCode":"3EAJyP","clicks":0,"createdAt":"2025-01-01T00:00:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "url")]
    pub original_url: String,
    pub short_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        short_code: String,
        original_url: String,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            original_url,
            short_code,
            clicks,
            created_at,
        }
    }

    /// Encodes the entry into the text value kept in the cache.
    pub fn to_cache_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes an entry previously written with [`Entry::to_cache_value`].
    pub fn from_cache_value(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }
}

/// Statistics projection of an [`Entry`].
///
/// `approximate_size` is the byte length of the cached value when served from
/// cache, and the byte length of the short code when served from the durable
/// store. It is not a true payload size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStats {
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub approximate_size: usize,
}

impl EntryStats {
    /// Zero clicks at the Unix epoch: what an absent row looks like when a
    /// store reports missing rows as zero values instead of `None`.
    pub fn is_degenerate(&self) -> bool {
        self.clicks == 0 && self.created_at.timestamp() == 0
    }
}
