//! End-to-end flow: raw snapshot body through extraction, ranking and the
//! event bus, with a mocked snapshot source.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use trendwatch::application::pipeline::MarketPipeline;
use trendwatch::domain::asset::AssetRecord;
use trendwatch::domain::events::{EventListener, MarketEvent};
use trendwatch::domain::ports::SnapshotSource;
use trendwatch::domain::ranking::ViewLimit;
use trendwatch::infrastructure::EventBus;

/// Two records: rank 1 moves +250%/hour +100%/day, rank 2 -50%/hour
/// +300%/day. Extra nested objects exercise structural decoding.
const RAW_BODY: &str = r#"[
  {
    "id": "alpha",
    "name": "Alpha",
    "rank": 1,
    "symbol": "ALP",
    "price": 12.5,
    "volume": 600000,
    "marketcap": 1200000.75,
    "performance": { "hour": 250, "day": 100, "week": 5, "month": -3 },
    "symbols": { "binance": "ALPUSDT", "kraken": null }
  },
  {
    "id": "beta",
    "name": "Beta",
    "rank": 2,
    "symbol": "BET",
    "price": 0.5,
    "volume": 900000,
    "marketcap": 300000,
    "performance": { "hour": -50, "day": 300 },
    "symbols": { "binance": "BETUSDT" }
  },
  {
    "id": "gamma",
    "name": "Unlisted",
    "rank": 3,
    "symbol": "GAM",
    "price": 3.0,
    "volume": 100,
    "marketcap": 1000,
    "performance": { "hour": 999, "day": 999 },
    "symbols": { "binance": null }
  }
]"#;

struct StaticSource {
    body: String,
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn fetch_snapshot(&self) -> Result<String> {
        Ok(self.body.clone())
    }
}

struct BatchForwarder {
    tx: mpsc::UnboundedSender<Arc<Vec<Arc<AssetRecord>>>>,
}

impl EventListener for BatchForwarder {
    fn on_event(&self, event: &MarketEvent) {
        if let MarketEvent::SnapshotUpdated { batch } = event {
            let _ = self.tx.send(Arc::clone(batch));
        }
    }
}

#[tokio::test]
async fn test_fetch_extract_rank_flow() {
    let bus = EventBus::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bus.subscribe(Arc::new(BatchForwarder { tx })).await;

    let source = Arc::new(StaticSource {
        body: RAW_BODY.to_string(),
    });
    let pipeline = MarketPipeline::new(source, bus);

    pipeline.run_cycle().await;

    // Listener saw the same batch the pipeline retains; the unlisted record
    // was dropped.
    let published = rx.recv().await.expect("batch published");
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|r| r.symbol != "GAM"));

    let views = pipeline.ranked(ViewLimit::Twenty).await;

    let hour_asc: Vec<i64> = views.hour_asc.iter().map(|r| r.rank).collect();
    assert_eq!(hour_asc, vec![2, 1]);
    let hour_desc: Vec<i64> = views.hour_desc.iter().map(|r| r.rank).collect();
    assert_eq!(hour_desc, vec![1, 2]);
    let day_desc: Vec<i64> = views.day_desc.iter().map(|r| r.rank).collect();
    assert_eq!(day_desc, vec![2, 1]);

    // Whole-number source percentages arrive scaled down.
    assert!((views.hour_desc[0].hour_change - 2.50).abs() < 1e-12);
    assert!((views.hour_desc[1].hour_change - -0.50).abs() < 1e-12);

    // Market cap was truncated, not rounded, and the ratio follows from the
    // coerced fields.
    let alpha = &views.hour_desc[0];
    assert_eq!(alpha.market_cap, 1_200_000);
    assert!((alpha.volume_to_cap_ratio - 0.5).abs() < 1e-12);

    let beta = &views.hour_asc[0];
    assert!((beta.volume_to_cap_ratio - 3.0).abs() < 1e-12);
}

struct FlakySource {
    responses: Mutex<Vec<Result<String>>>,
}

#[async_trait]
impl SnapshotSource for FlakySource {
    async fn fetch_snapshot(&self) -> Result<String> {
        self.responses.lock().unwrap().remove(0)
    }
}

#[tokio::test]
async fn test_failed_poll_is_not_fatal() {
    let bus = EventBus::new();
    let source = Arc::new(FlakySource {
        responses: Mutex::new(vec![
            Err(anyhow::anyhow!("dns failure")),
            Ok(RAW_BODY.to_string()),
        ]),
    });
    let pipeline = MarketPipeline::new(source, bus);

    // First poll fails; the pipeline carries on with an empty batch.
    pipeline.run_cycle().await;
    assert!(pipeline.latest_batch().await.is_empty());

    // Next poll succeeds and replaces the batch wholesale.
    pipeline.run_cycle().await;
    assert_eq!(pipeline.latest_batch().await.len(), 2);
}
