pub mod exchange_rate_api;
pub mod fallback;

use crate::core::RatesProvider;
use crate::core::config::ProvidersConfig;
use anyhow::Result;

pub use exchange_rate_api::HttpRatesProvider;
pub use fallback::FallbackRatesProvider;

/// Builds the primary, then backup, provider chain from configuration.
pub fn from_config(config: &ProvidersConfig) -> Result<FallbackRatesProvider> {
    let mut providers: Vec<Box<dyn RatesProvider>> = vec![Box::new(
        HttpRatesProvider::from_config("primary", &config.primary)?,
    )];
    if let Some(backup) = &config.backup {
        providers.push(Box::new(HttpRatesProvider::from_config("backup", backup)?));
    }
    Ok(FallbackRatesProvider::new(providers))
}
