//! Remote exchange-rate source abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// A source of "1 unit of base = rate units of code" tables.
#[async_trait]
pub trait RatesProvider: Send + Sync {
    /// Short name used in logs and error reports.
    fn name(&self) -> &str;

    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>>;
}
