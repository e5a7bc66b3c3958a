use crate::core::config::ProviderConfig;
use crate::core::{FxError, RatesProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("spendfx/", env!("CARGO_PKG_VERSION"));

/// Fetches `GET {base_url}/{base}` and reads the `rates` object from the body.
///
/// Works with any endpoint shaped like exchangerate-api.com's `latest` API.
pub struct HttpRatesProvider {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpRatesProvider {
    pub fn new(name: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(HttpRatesProvider {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(name: &str, config: &ProviderConfig) -> Result<Self> {
        Self::new(
            name,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RatesProvider for HttpRatesProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "RatesFetch",
        skip(self),
        fields(provider = %self.name, base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {} URL: {}", e, base, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;

        let data: RatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        match data.rates {
            Some(rates) if !rates.is_empty() => {
                debug!("Received {} rates for {}", rates.len(), base);
                Ok(rates)
            }
            _ => Err(FxError::InvalidResponse(format!("no rates for base {base}")).into()),
        }
    }
}
