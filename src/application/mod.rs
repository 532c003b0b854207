//! Application layer: the link core.
//!
//! - [`services::TieredEntryStore`] - Cache-then-durable reads, write-through creation
//! - [`services::LinkService`] - Input validation, code resolution and result shaping
//! - [`click_worker`] - Background click counting
//! - [`errors`] - Error taxonomy

pub mod click_worker;
pub mod errors;
pub mod services;

pub use errors::{CreationError, LinkError, StoreError};
