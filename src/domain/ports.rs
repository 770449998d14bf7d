use anyhow::Result;
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the raw market snapshot body from the upstream endpoint.
    async fn fetch_snapshot(&self) -> Result<String>;
}
