//! Persistence for the single exchange-rate snapshot

pub mod disk;
pub mod memory;

use crate::core::ExchangeRateSnapshot;
use anyhow::Result;
use async_trait::async_trait;

pub use disk::JsonFileStore;
pub use memory::MemoryStore;

/// Holds at most one snapshot; every save overwrites the previous one.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet. Unreadable data is an error.
    async fn load(&self) -> Result<Option<ExchangeRateSnapshot>>;

    async fn save(&self, snapshot: &ExchangeRateSnapshot) -> Result<()>;

    /// Human readable location, for status output.
    fn location(&self) -> String;
}
