//! Exchange-rate lookups backed by a cached snapshot and a remote provider.

use crate::core::currency::{BASE_CURRENCY, SUPPORTED_CURRENCIES, is_supported, normalize_code};
use crate::core::snapshot::humanize_age;
use crate::core::{ExchangeRateSnapshot, FxError, RatesProvider};
use crate::store::SnapshotStore;
use chrono::{Duration, Local, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Rate paired with its display string, e.g. `(56.1234, "56.1234 PHP")`.
pub type FormattedRate = (f64, String);

/// Rounds on the decimal representation, half to even.
fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

fn rate_or_default(rates: &HashMap<String, f64>, code: &str) -> f64 {
    match rates.get(code) {
        Some(rate) => *rate,
        None => {
            debug!("No rate for {}, assuming 1.0", code);
            1.0
        }
    }
}

fn default_rates() -> HashMap<String, f64> {
    SUPPORTED_CURRENCIES
        .iter()
        .map(|code| (code.to_string(), 1.0))
        .collect()
}

/// Fills supported codes absent from `rates` with 1.0.
fn complete(mut rates: HashMap<String, f64>) -> HashMap<String, f64> {
    for code in SUPPORTED_CURRENCIES {
        if !rates.contains_key(code) {
            warn!("No rate available for {}, using 1.0", code);
            rates.insert(code.to_string(), 1.0);
        }
    }
    rates
}

/// Serves exchange rates from a cached snapshot, refreshing it from the
/// provider once it is older than the freshness window.
///
/// Construct once at startup and share by reference. No operation returns an
/// error for network or cache failures: each degrades to the next tier (fresh
/// cache, remote fetch, stale cache, 1:1 rates).
pub struct ExchangeRateService {
    provider: Arc<dyn RatesProvider>,
    store: Arc<dyn SnapshotStore>,
    base_currency: String,
    freshness: Duration,
    // serialises load, fetch and save within this process
    refresh_lock: Mutex<()>,
}

impl ExchangeRateService {
    pub fn new(provider: Arc<dyn RatesProvider>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            provider,
            store,
            base_currency: BASE_CURRENCY.to_string(),
            freshness: Duration::hours(6),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    /// Unsupported codes are ignored and the current base is kept.
    pub fn with_base_currency(mut self, base: &str) -> Self {
        let base = normalize_code(base);
        if is_supported(&base) {
            self.base_currency = base;
        } else {
            warn!(
                "Unsupported base currency {}, keeping {}",
                base, self.base_currency
            );
        }
        self
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn cache_location(&self) -> String {
        self.store.location()
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    async fn load_snapshot(&self) -> Option<ExchangeRateSnapshot> {
        match self.store.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring unreadable rate cache: {:#}", e);
                None
            }
        }
    }

    /// Rates against `base` (defaults to the service base currency).
    ///
    /// Returns a fresh cached table without touching the network unless
    /// `force_refresh` is set. Always covers every supported currency.
    pub async fn get_rates(&self, base: Option<&str>, force_refresh: bool) -> HashMap<String, f64> {
        let base = match base.map(normalize_code) {
            Some(code) if is_supported(&code) => code,
            Some(code) => {
                warn!(
                    "Unsupported base currency {}, using {}",
                    code, self.base_currency
                );
                self.base_currency.clone()
            }
            None => self.base_currency.clone(),
        };
        let _guard = self.refresh_lock.lock().await;

        let cached = self.load_snapshot().await;
        if !force_refresh {
            if let Some(snapshot) = &cached {
                if snapshot.is_fresh(Self::now(), self.freshness) {
                    if let Some(rates) = snapshot.rates_for(&base) {
                        debug!("Using cached rates from {}", snapshot.timestamp);
                        return complete(rates);
                    }
                } else {
                    debug!("Cached rates from {} are stale", snapshot.timestamp);
                }
            }
        }

        match self.provider.fetch_rates(&base).await {
            Ok(fetched) => {
                let snapshot = ExchangeRateSnapshot::new(&base, fetched, Self::now());
                if let Err(e) = self.store.save(&snapshot).await {
                    warn!("Failed to persist rate cache: {:#}", e);
                }
                return complete(snapshot.rates);
            }
            Err(e) => warn!("Failed to fetch exchange rates: {:#}", e),
        }

        if let Some(snapshot) = cached {
            if let Some(rates) = snapshot.rates_for(&base) {
                warn!(
                    "Using stale exchange rates from {} ({})",
                    snapshot.timestamp,
                    humanize_age(snapshot.age(Self::now()))
                );
                return complete(rates);
            }
        }

        warn!("No exchange rates available, falling back to 1:1 rates");
        default_rates()
    }

    /// Converts `amount` between currencies, rounded to 2 decimals.
    ///
    /// Codes without a rate behave as 1.0; see [`Self::try_convert`].
    pub async fn convert(&self, amount: f64, from_currency: &str, to_currency: &str) -> f64 {
        let from = normalize_code(from_currency);
        let to = normalize_code(to_currency);
        if from == to {
            return amount;
        }

        let rates = self.get_rates(None, false).await;
        let mut base_amount = amount;
        if from != self.base_currency {
            base_amount = amount / rate_or_default(&rates, &from);
        }
        round_dp(base_amount * rate_or_default(&rates, &to), 2)
    }

    /// "1 unit of `from` = result units of `to`", rounded to 4 decimals.
    pub async fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> f64 {
        let from = normalize_code(from_currency);
        let to = normalize_code(to_currency);
        if from == to {
            return 1.0;
        }

        let rates = self.get_rates(None, false).await;
        round_dp(
            rate_or_default(&rates, &to) / rate_or_default(&rates, &from),
            4,
        )
    }

    /// Like [`Self::convert`] but rejects codes outside the supported set.
    pub async fn try_convert(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<f64, FxError> {
        ensure_supported(from_currency)?;
        ensure_supported(to_currency)?;
        Ok(self.convert(amount, from_currency, to_currency).await)
    }

    /// Like [`Self::get_exchange_rate`] but rejects codes outside the supported set.
    pub async fn try_get_exchange_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<f64, FxError> {
        ensure_supported(from_currency)?;
        ensure_supported(to_currency)?;
        Ok(self.get_exchange_rate(from_currency, to_currency).await)
    }

    /// Relative age of the persisted snapshot, `None` if absent or unreadable.
    pub async fn get_cache_age(&self) -> Option<String> {
        let snapshot = self.load_snapshot().await?;
        Some(humanize_age(snapshot.age(Self::now())))
    }

    /// Every supported currency's rate against `base`, with a display string.
    pub async fn get_all_rates_formatted(&self, base: &str) -> BTreeMap<String, FormattedRate> {
        let base = normalize_code(base);
        let rates = self.get_rates(None, false).await;
        let base_rate = rate_or_default(&rates, &base);

        SUPPORTED_CURRENCIES
            .iter()
            .map(|code| {
                let entry = if *code == base {
                    (1.0, format!("1.00 {code}"))
                } else {
                    let rate = round_dp(rate_or_default(&rates, code) / base_rate, 4);
                    (rate, format!("{rate:.4} {code}"))
                };
                (code.to_string(), entry)
            })
            .collect()
    }
}

fn ensure_supported(code: &str) -> Result<(), FxError> {
    let code = normalize_code(code);
    if is_supported(&code) {
        Ok(())
    } else {
        Err(FxError::UnsupportedCurrency(code))
    }
}
