use super::SnapshotStore;
use crate::core::ExchangeRateSnapshot;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// In-process snapshot store, lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<ExchangeRateSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `snapshot`.
    pub fn with_snapshot(snapshot: ExchangeRateSnapshot) -> Self {
        Self {
            inner: Mutex::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<ExchangeRateSnapshot>> {
        let snapshot = self.inner.lock().await.clone();
        debug!(
            "Memory snapshot {}",
            if snapshot.is_some() { "HIT" } else { "MISS" }
        );
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &ExchangeRateSnapshot) -> Result<()> {
        *self.inner.lock().await = Some(snapshot.clone());
        debug!("Memory snapshot PUT");
        Ok(())
    }

    fn location(&self) -> String {
        "in-memory".to_string()
    }
}
