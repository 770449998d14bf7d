use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::config::Config;
use crate::domain::ports::SnapshotSource;

/// Snapshot source backed by the CryptoBubbles JSON endpoint.
///
/// Sends a desktop-browser user-agent and an accept-language header; the
/// upstream varies payload shape by locale. No request timeout is set, so a
/// stalled poll blocks only the worker task that issued it.
pub struct CryptoBubblesSource {
    client: Client,
    url: String,
}

impl CryptoBubblesSource {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("invalid user-agent header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("invalid accept-language header")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url: config.snapshot_url.clone(),
        })
    }
}

#[async_trait]
impl SnapshotSource for CryptoBubblesSource {
    async fn fetch_snapshot(&self) -> Result<String> {
        debug!("Fetching snapshot from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?;

        if !response.status().is_success() {
            anyhow::bail!("snapshot endpoint returned status: {}", response.status());
        }

        response
            .text()
            .await
            .context("failed to read snapshot body")
    }
}
