//! Click event model for asynchronous click counting.

/// A resolved short code, queued for the click worker.
///
/// Sent from the resolve path through a bounded channel so that counting a
/// click never delays the response. Processed by
/// [`crate::application::click_worker::run_click_worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
