use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::domain::asset::AssetRecord;
use crate::domain::events::{EventListener, MarketEvent};
use crate::domain::ranking::{RankCriterion, RankedViews, ViewLimit, rank};

const COLUMNS: [&str; 9] = [
    "rank",
    "name",
    "symbol",
    "price",
    "market_cap",
    "volume",
    "hour_change",
    "day_change",
    "volume_to_cap_ratio",
];

/// Writes a timestamped fixed-width report of all four ranked views whenever
/// a snapshot lands. Best-effort: I/O failures are logged, never propagated.
pub struct ReportListener {
    dir: PathBuf,
    limit: ViewLimit,
}

impl ReportListener {
    pub fn new(dir: PathBuf, limit: ViewLimit) -> Self {
        Self { dir, limit }
    }

    fn write_report(&self, batch: &[Arc<AssetRecord>]) -> Result<()> {
        let views = rank(batch, self.limit.as_len());
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create {}", self.dir.display()))?;

        let stamp = Local::now();
        let path = self
            .dir
            .join(format!("{} top movers.txt", stamp.format("%Y-%m-%d %H%M%S")));

        let mut content = format!("[{}]\n\n", stamp.format("%Y-%m-%d %H:%M:%S %z"));
        for (title, view) in [
            ("Hourly change, ascending", &views.hour_asc),
            ("Hourly change, descending", &views.hour_desc),
            ("Daily change, ascending", &views.day_asc),
            ("Daily change, descending", &views.day_desc),
        ] {
            content.push_str(&"=".repeat(120));
            content.push_str(&format!("\n{}\n\n", title));
            content.push_str(&format!(
                "{:<8}{:<32}{:<10}{:>14}{:>20}{:>20}{:>10}{:>10}{:>10}\n",
                "rank", "name", "symbol", "price", "market cap", "volume", "hour", "day", "vol/cap",
            ));
            for record in view {
                content.push_str(&format_report_row(record));
            }
            content.push('\n');
        }

        let mut file =
            fs::File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("cannot write {}", path.display()))?;

        info!("Report written to {}", path.display());
        Ok(())
    }
}

fn format_report_row(record: &AssetRecord) -> String {
    format!(
        "{:<8}{:<32}{:<10}{:>14.6}{:>20}{:>20}{:>9.2}%{:>9.2}%{:>10.2}\n",
        record.rank,
        record.name,
        record.symbol,
        record.price,
        record.market_cap,
        record.volume,
        record.hour_change * 100.0,
        record.day_change * 100.0,
        record.volume_to_cap_ratio,
    )
}

impl EventListener for ReportListener {
    fn on_event(&self, event: &MarketEvent) {
        if let MarketEvent::SnapshotUpdated { batch } = event {
            if let Err(e) = self.write_report(batch) {
                warn!("Report export failed: {:#}", e);
            }
        }
    }
}

/// Appends the selected ranked view to a CSV history file on every snapshot.
///
/// Each batch starts with a header row and writes its rows in reverse of
/// sorted order.
pub struct CsvListener {
    path: PathBuf,
    limit: ViewLimit,
    criterion: RankCriterion,
}

impl CsvListener {
    pub fn new(path: PathBuf, limit: ViewLimit, criterion: RankCriterion) -> Self {
        Self {
            path,
            limit,
            criterion,
        }
    }

    fn append_batch(&self, batch: &[Arc<AssetRecord>]) -> Result<()> {
        let views: RankedViews = rank(batch, self.limit.as_len());
        let view = views.select(self.criterion);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open {}", self.path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(COLUMNS).context("cannot write header")?;
        for record in view.iter().rev() {
            writer
                .write_record(&[
                    record.rank.to_string(),
                    record.name.clone(),
                    record.symbol.clone(),
                    record.price.to_string(),
                    record.market_cap.to_string(),
                    record.volume.to_string(),
                    record.hour_change.to_string(),
                    record.day_change.to_string(),
                    record.volume_to_cap_ratio.to_string(),
                ])
                .context("cannot write row")?;
        }
        writer.flush().context("cannot flush CSV")?;

        Ok(())
    }
}

impl EventListener for CsvListener {
    fn on_event(&self, event: &MarketEvent) {
        if let MarketEvent::SnapshotUpdated { batch } = event {
            if let Err(e) = self.append_batch(batch) {
                warn!("CSV export failed: {:#}", e);
            }
        }
    }
}
