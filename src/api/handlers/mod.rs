//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod create;
pub mod health;
pub mod links;
pub mod redirect;
pub mod stats;

pub use create::create_handler;
pub use health::{health_handler, root_handler};
pub use links::link_handler;
pub use redirect::redirect_handler;
pub use stats::stats_handler;
