//! DTO for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkStats;

/// Statistics for a single short link.
///
/// `size` is approximate: the length of the cached value on a cache hit,
/// the length of the code otherwise.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub entry_id: String,
    pub clicks: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub size: usize,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            entry_id: stats.short_code,
            clicks: stats.clicks,
            created_at: stats.created_at,
            size: stats.approximate_size,
        }
    }
}
