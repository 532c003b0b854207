//! Repository trait definitions for the domain layer.
//!
//! The durable store is an opaque key-value service keyed on the short code.
//! Implementations live in `crate::infrastructure::persistence`; a `mockall`
//! mock is generated for unit tests.

pub mod entry_repository;

pub use entry_repository::{EntryRepository, RepositoryError};

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
