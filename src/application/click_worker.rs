//! Background worker that turns click events into durable click counts.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::application::services::TieredEntryStore;
use crate::domain::click_event::ClickEvent;

/// Number of retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Each event increments the durable counter (retried with exponential
/// backoff) and refreshes the cached copy with the updated entry. Events for
/// codes without a durable entry are discarded.
pub async fn run_click_worker(mut rx: mpsc::Receiver<ClickEvent>, store: Arc<TieredEntryStore>) {
    info!("Click worker running");

    while let Some(event) = rx.recv().await {
        process_click(&store, &event).await;
    }

    info!("Click queue closed, click worker stopping");
}

async fn process_click(store: &TieredEntryStore, event: &ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(10)
        .factor(2)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::start(strategy, move || async move {
        store.record_click(&event.code).await.inspect_err(|e| {
            warn!("Click update for {} failed, will retry: {}", event.code, e);
        })
    })
    .await;

    match result {
        Ok(Some(entry)) => {
            debug!("Counted click for {} (total {})", entry.short_code, entry.clicks);
            counter!("click_events_processed_total").increment(1);
        }
        Ok(None) => {
            debug!("Click for unknown code {} discarded", event.code);
        }
        Err(e) => {
            error!("Giving up on click for {}: {}", event.code, e);
            counter!("click_events_failed_total").increment(1);
        }
    }
}
