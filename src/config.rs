use std::path::PathBuf;
use std::time::Duration;

use crate::domain::ranking::ViewLimit;
use crate::domain::refresh::RefreshInterval;

/// Upstream market snapshot endpoint.
pub const SNAPSHOT_URL: &str = "https://cryptobubbles.net/backend/data/bubbles1000.usd.json";

/// The upstream varies payload shape by locale, so both headers are required.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/86.0.4240.198 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9";

/// Runtime configuration. Held in memory only: there is no settings file and
/// no environment override, so every start begins from these defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub snapshot_url: String,
    pub user_agent: String,
    pub accept_language: String,
    /// Result-set size for ranked views fed to exports and listeners.
    pub view_limit: ViewLimit,
    /// Interval driving both the recurring trigger and the display countdown.
    pub refresh_interval: RefreshInterval,
    /// Cap on overlapping pipeline runs; firings beyond it are skipped.
    pub max_concurrent_runs: usize,
    pub records_dir: PathBuf,
    pub csv_path: PathBuf,
}

impl Config {
    pub fn trigger_period(&self) -> Duration {
        self.refresh_interval.as_duration()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_url: SNAPSHOT_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            view_limit: ViewLimit::Twenty,
            refresh_interval: RefreshInterval::hourly(),
            max_concurrent_runs: 3,
            records_dir: PathBuf::from("crypto_records"),
            csv_path: PathBuf::from("crypto_records/trend_history.csv"),
        }
    }
}
