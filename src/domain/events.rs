use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::asset::AssetRecord;

/// Events published by the pipeline and the countdown task.
///
/// Presentation layers subscribe listeners and receive these on worker
/// context; anything with thread affinity forwards through its own channel
/// instead of being mutated directly.
#[derive(Debug, Clone)]
pub enum MarketEvent {
    /// A fetch cycle completed and the batch was replaced wholesale.
    SnapshotUpdated { batch: Arc<Vec<Arc<AssetRecord>>> },
    /// A fetch or extraction failed; the previous batch stays in effect.
    SnapshotFailed { reason: String },
    /// One second of the display countdown elapsed.
    CountdownTick { progress_percent: u8, remaining: String },
}

pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &MarketEvent);
}

/// Listener that mirrors events into the log stream.
pub struct LoggingListener;

impl EventListener for LoggingListener {
    fn on_event(&self, event: &MarketEvent) {
        match event {
            MarketEvent::SnapshotUpdated { batch } => {
                info!("Snapshot updated: {} assets", batch.len());
            }
            MarketEvent::SnapshotFailed { reason } => {
                warn!("Snapshot refresh failed: {}", reason);
            }
            MarketEvent::CountdownTick {
                progress_percent,
                remaining,
            } => {
                debug!("Next refresh in {} ({}%)", remaining, progress_percent);
            }
        }
    }
}
