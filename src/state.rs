use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::EntryRepository;
use crate::infrastructure::cache::CacheService;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
    pub repository: Arc<dyn EntryRepository>,
    /// `None` when click tracking is disabled.
    pub click_sender: Option<mpsc::Sender<ClickEvent>>,
}
