//! Domain layer containing the link entry model and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - The [`entities::Entry`] record and its cache encoding
//! - [`repositories`] - Durable store trait definition
//! - [`click_event`] - Click tracking event model
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod click_event;
pub mod entities;
pub mod repositories;
