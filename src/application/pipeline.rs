use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::application::extractor::RecordExtractor;
use crate::domain::asset::AssetRecord;
use crate::domain::events::MarketEvent;
use crate::domain::ports::SnapshotSource;
use crate::domain::ranking::{RankedViews, ViewLimit, rank};
use crate::infrastructure::EventBus;

/// Owns the fetch → extract → rank cycle and the latest batch.
///
/// A failed poll keeps the previous batch in place; listeners only ever see a
/// wholesale replacement, never a partial merge.
pub struct MarketPipeline {
    source: Arc<dyn SnapshotSource>,
    extractor: RecordExtractor,
    event_bus: EventBus,
    batch: RwLock<Arc<Vec<Arc<AssetRecord>>>>,
}

impl MarketPipeline {
    pub fn new(source: Arc<dyn SnapshotSource>, event_bus: EventBus) -> Self {
        Self {
            source,
            extractor: RecordExtractor::new(),
            event_bus,
            batch: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// One full refresh cycle. Never returns an error: a failed poll is
    /// logged and published so the system keeps running on stale data.
    pub async fn run_cycle(&self) {
        let raw = match self.source.fetch_snapshot().await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Snapshot fetch failed: {:#}", e);
                self.event_bus
                    .publish(MarketEvent::SnapshotFailed {
                        reason: format!("{e:#}"),
                    })
                    .await;
                return;
            }
        };

        match self.extractor.extract(&raw) {
            Ok(records) => {
                info!("Extracted {} assets from snapshot", records.len());
                let batch = Arc::new(records);
                *self.batch.write().await = Arc::clone(&batch);
                self.event_bus
                    .publish(MarketEvent::SnapshotUpdated { batch })
                    .await;
            }
            Err(e) => {
                error!("Snapshot extraction failed: {}", e);
                self.event_bus
                    .publish(MarketEvent::SnapshotFailed {
                        reason: e.to_string(),
                    })
                    .await;
            }
        }
    }

    pub async fn latest_batch(&self) -> Arc<Vec<Arc<AssetRecord>>> {
        Arc::clone(&*self.batch.read().await)
    }

    /// Recompute the four views from the latest batch, e.g. after the caller
    /// changes the result-set size or selection criterion.
    pub async fn ranked(&self, limit: ViewLimit) -> RankedViews {
        let batch = self.latest_batch().await;
        rank(&batch, limit.as_len())
    }
}
