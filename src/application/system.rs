use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::pipeline::MarketPipeline;
use crate::application::scheduler::RefreshScheduler;
use crate::config::Config;
use crate::domain::events::LoggingListener;
use crate::domain::ports::SnapshotSource;
use crate::infrastructure::EventBus;
use crate::infrastructure::bubbles::CryptoBubblesSource;
use crate::infrastructure::export::{CsvListener, ReportListener};

/// Wires the snapshot source, pipeline, exports and scheduler together.
pub struct Application {
    pub config: Config,
    pub event_bus: EventBus,
    pub pipeline: Arc<MarketPipeline>,
    pub scheduler: Arc<RefreshScheduler>,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self> {
        info!("Building Trendwatch application...");

        let event_bus = EventBus::new();

        let source: Arc<dyn SnapshotSource> = Arc::new(CryptoBubblesSource::new(&config)?);
        let pipeline = Arc::new(MarketPipeline::new(source, event_bus.clone()));
        let scheduler = Arc::new(RefreshScheduler::new(
            Arc::clone(&pipeline),
            event_bus.clone(),
            &config,
        ));

        event_bus.subscribe(Arc::new(LoggingListener)).await;
        event_bus
            .subscribe(Arc::new(ReportListener::new(
                config.records_dir.clone(),
                config.view_limit,
            )))
            .await;
        event_bus
            .subscribe(Arc::new(CsvListener::new(
                config.csv_path.clone(),
                config.view_limit,
                Default::default(),
            )))
            .await;

        Ok(Self {
            config,
            event_bus,
            pipeline,
            scheduler,
        })
    }

    /// Run the initial fetch cycle, then hand control to the recurring
    /// trigger and the display countdown. A scheduler that cannot start is
    /// fatal; errors here should terminate the process.
    pub async fn start(&self) -> Result<()> {
        info!("Running initial refresh cycle...");
        self.pipeline.run_cycle().await;

        self.scheduler.start().await?;
        info!(
            "Scheduler running, refreshing every {}",
            self.scheduler.interval()
        );
        Ok(())
    }
}
