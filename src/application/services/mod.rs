//! Business logic services for the application layer.

pub mod entry_store;
pub mod link_service;

pub use entry_store::{CacheWritePolicy, PutOutcome, TieredEntryStore};
pub use link_service::{CreateLink, LinkRecord, LinkService, LinkStats};
