use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::asset::AssetRecord;
use crate::domain::errors::ExtractError;

/// Shape of one upstream snapshot entry. Only the fields we surface are
/// declared; the payload carries many more that serde ignores.
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: String,
    rank: i64,
    symbol: String,
    price: f64,
    volume: f64,
    marketcap: f64,
    performance: RawPerformance,
}

/// Percentage moves encoded as whole numbers, e.g. 1.23 for +1.23%.
#[derive(Debug, Deserialize)]
struct RawPerformance {
    hour: f64,
    day: f64,
}

/// Turns the raw snapshot body into typed records.
///
/// The whole document is decoded once and each entry accessed structurally,
/// so nested objects inside a record can never confuse record boundaries.
/// The error boundary is per record: one malformed entry is logged and
/// skipped, the rest of the batch goes through. Input order is preserved.
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, raw: &str) -> Result<Vec<Arc<AssetRecord>>, ExtractError> {
        let document: Vec<Value> = serde_json::from_str(raw)
            .map_err(|e| ExtractError::MalformedDocument(e.to_string()))?;

        let mut records = Vec::with_capacity(document.len());
        for entry in document {
            if !has_liquidity_source(&entry) {
                debug!(
                    "Dropping {}: no binance listing",
                    entry.get("symbol").and_then(|v| v.as_str()).unwrap_or("?")
                );
                continue;
            }

            match record_from_value(entry) {
                Ok(record) => records.push(Arc::new(record)),
                Err(e) => warn!("Skipping record: {}", e),
            }
        }

        Ok(records)
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A record only survives if its nested exchange map carries a non-null
/// binance entry; a missing entry counts the same as an explicit null.
fn has_liquidity_source(entry: &Value) -> bool {
    entry
        .get("symbols")
        .and_then(|symbols| symbols.get("binance"))
        .is_some_and(|binance| !binance.is_null())
}

fn record_from_value(entry: Value) -> Result<AssetRecord, ExtractError> {
    let raw: RawRecord =
        serde_json::from_value(entry).map_err(|e| ExtractError::MalformedRecord(e.to_string()))?;

    // Fractional part is discarded, never rounded.
    let market_cap = raw.marketcap.trunc() as i64;
    let volume = raw.volume.trunc() as i64;

    if market_cap == 0 {
        return Err(ExtractError::ZeroMarketCap { symbol: raw.symbol });
    }

    Ok(AssetRecord {
        name: raw.name,
        rank: raw.rank,
        symbol: raw.symbol,
        price: raw.price,
        volume,
        market_cap,
        // Source encodes percentages as whole numbers.
        hour_change: raw.performance.hour / 100.0,
        day_change: raw.performance.day / 100.0,
        volume_to_cap_ratio: volume as f64 / market_cap as f64,
    })
}
