use super::SnapshotStore;
use crate::core::ExchangeRateSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores the snapshot as a single JSON document.
///
/// Saves write a sibling temp file and rename it over the target, so readers
/// see either the old or the new snapshot. Concurrent writers from several
/// processes are not coordinated: the last rename wins.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "exchange_rates.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Option<ExchangeRateSnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read snapshot: {}", self.path.display())
                });
            }
        };

        let mut snapshot: ExchangeRateSnapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;
        snapshot.sanitize();
        debug!("Loaded snapshot from {}", self.path.display());
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &ExchangeRateSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        let data = serde_json::to_vec_pretty(snapshot)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, data)
            .await
            .with_context(|| format!("Failed to write snapshot to {}", temp_path.display()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace snapshot at {}", self.path.display()))?;
        debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
