//! DTO for a resolved link.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkRecord;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl From<LinkRecord> for LinkResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            url: record.url,
            short_code: record.short_code,
            created_at: record.created_at,
            clicks: record.clicks,
        }
    }
}
