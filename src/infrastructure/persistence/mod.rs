//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgEntryRepository`] - Entry storage, lookup and click counting

pub mod pg_entry_repository;

pub use pg_entry_repository::PgEntryRepository;
