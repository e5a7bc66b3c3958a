use crate::core::{FxError, RatesProvider};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Tries each provider in order and returns the first successful table.
pub struct FallbackRatesProvider {
    providers: Vec<Box<dyn RatesProvider>>,
}

impl FallbackRatesProvider {
    pub fn new(providers: Vec<Box<dyn RatesProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl RatesProvider for FallbackRatesProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.fetch_rates(base).await {
                Ok(rates) => {
                    debug!("Rates for {} served by {}", base, provider.name());
                    return Ok(rates);
                }
                Err(e) => {
                    warn!("Rate provider {} failed: {}", provider.name(), e);
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }
        Err(FxError::AllProvidersFailed(failures.join("; ")).into())
    }
}
