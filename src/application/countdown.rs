use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time;
use tracing::{debug, info};

use crate::domain::events::MarketEvent;
use crate::domain::refresh::{format_remaining, progress_percent};
use crate::infrastructure::EventBus;

/// Spawns the one-second display countdown.
///
/// The countdown is purely informational: it never triggers a refetch, the
/// recurring trigger does that on its own cadence. Only one countdown may be
/// live at a time, enforced by a mutex held from first tick to exit.
pub struct Countdown {
    gate: Arc<Mutex<()>>,
    event_bus: EventBus,
}

/// Token for the running countdown task. Cancellation is cooperative and
/// observed within one tick interval.
pub struct CountdownHandle {
    cancel_tx: watch::Sender<bool>,
}

impl CountdownHandle {
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }
}

impl Countdown {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            gate: Arc::new(Mutex::new(())),
            event_bus,
        }
    }

    pub fn start(&self, total_seconds: u64) -> CountdownHandle {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let gate = Arc::clone(&self.gate);
        let event_bus = self.event_bus.clone();

        tokio::spawn(async move {
            let _guard = gate.lock().await;
            info!(
                "Countdown started: {} until next refresh",
                format_remaining(total_seconds)
            );

            let mut remaining = total_seconds;
            let mut elapsed = 0u64;
            while remaining > 0 {
                tokio::select! {
                    _ = time::sleep(Duration::from_secs(1)) => {}
                    _ = cancelled(&mut cancel_rx) => {
                        debug!("Countdown cancelled with {} left", format_remaining(remaining));
                        return;
                    }
                }

                remaining -= 1;
                elapsed += 1;
                event_bus
                    .publish(MarketEvent::CountdownTick {
                        progress_percent: progress_percent(elapsed, total_seconds),
                        remaining: format_remaining(remaining),
                    })
                    .await;
            }

            debug!("Countdown expired");
        });

        CountdownHandle { cancel_tx }
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|flag| *flag).await.is_err() {
        // Handle dropped without cancelling: run to natural expiry.
        std::future::pending::<()>().await;
    }
}
