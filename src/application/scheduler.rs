use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{Mutex, Semaphore, watch};
use tokio::time;
use tracing::{info, warn};

use crate::application::countdown::{Countdown, CountdownHandle};
use crate::application::pipeline::MarketPipeline;
use crate::config::Config;
use crate::domain::refresh::RefreshInterval;
use crate::infrastructure::EventBus;

/// Drives the two timed activities: the recurring trigger that re-runs the
/// pipeline, and the display countdown.
///
/// The trigger alone causes refetches; the countdown only reports progress,
/// and is restarted whenever a new interval is committed.
pub struct RefreshScheduler {
    pipeline: Arc<MarketPipeline>,
    countdown: Countdown,
    period_tx: watch::Sender<Duration>,
    run_slots: Arc<Semaphore>,
    max_concurrent_runs: usize,
    interval: std::sync::Mutex<RefreshInterval>,
    current: Mutex<Option<CountdownHandle>>,
}

impl RefreshScheduler {
    pub fn new(pipeline: Arc<MarketPipeline>, event_bus: EventBus, config: &Config) -> Self {
        let (period_tx, _) = watch::channel(config.trigger_period());
        Self {
            pipeline,
            countdown: Countdown::new(event_bus),
            period_tx,
            run_slots: Arc::new(Semaphore::new(config.max_concurrent_runs)),
            max_concurrent_runs: config.max_concurrent_runs,
            interval: std::sync::Mutex::new(config.refresh_interval),
            current: Mutex::new(None),
        }
    }

    /// Spawn the recurring trigger and the first countdown. Failing here is
    /// fatal to the process: without the trigger nothing ever refreshes.
    pub async fn start(&self) -> Result<()> {
        let mut current = self.current.lock().await;
        if current.is_some() {
            anyhow::bail!("scheduler already started");
        }

        tokio::spawn(trigger_loop(
            Arc::clone(&self.pipeline),
            self.period_tx.subscribe(),
            Arc::clone(&self.run_slots),
            self.max_concurrent_runs,
        ));

        let interval = *self.interval.lock().unwrap();
        *current = Some(self.countdown.start(interval.total_seconds()));
        Ok(())
    }

    /// Commit an already-validated interval: atomically update the trigger
    /// period, cancel the live countdown and start a fresh one from the new
    /// total. On any failure the existing schedule stays untouched.
    pub async fn set_interval(&self, interval: RefreshInterval) -> Result<()> {
        self.period_tx
            .send(interval.as_duration())
            .context("recurring trigger is not running")?;
        *self.interval.lock().unwrap() = interval;

        let mut current = self.current.lock().await;
        if let Some(handle) = current.take() {
            handle.cancel();
        }
        *current = Some(self.countdown.start(interval.total_seconds()));

        info!("Refresh interval set to {}", interval);
        Ok(())
    }

    pub fn interval(&self) -> RefreshInterval {
        *self.interval.lock().unwrap()
    }
}

async fn trigger_loop(
    pipeline: Arc<MarketPipeline>,
    mut period_rx: watch::Receiver<Duration>,
    run_slots: Arc<Semaphore>,
    max_concurrent_runs: usize,
) {
    let mut period = *period_rx.borrow();
    info!("Recurring trigger started: every {:?}", period);

    loop {
        tokio::select! {
            _ = time::sleep(period) => {
                // Overlapping runs are allowed up to the cap; a firing at the
                // cap is skipped, never merged into a running cycle.
                match Arc::clone(&run_slots).try_acquire_owned() {
                    Ok(permit) => {
                        let pipeline = Arc::clone(&pipeline);
                        tokio::spawn(async move {
                            pipeline.run_cycle().await;
                            drop(permit);
                        });
                    }
                    Err(_) => {
                        warn!(
                            "Refresh skipped: {} runs already in flight",
                            max_concurrent_runs
                        );
                    }
                }
            }
            changed = period_rx.changed() => {
                if changed.is_err() {
                    info!("Recurring trigger stopped");
                    break;
                }
                period = *period_rx.borrow();
                info!("Trigger period now {:?}", period);
            }
        }
    }
}
