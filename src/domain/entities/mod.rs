//! Core domain entities.
//!
//! - [`Entry`] - A short code mapped to its original URL, with click statistics
//! - [`EntryStats`] - The reduced statistics projection of an entry

pub mod entry;

pub use entry::{Entry, EntryStats};
