//! The cached exchange-rate snapshot and its freshness rules

use crate::core::currency::is_supported;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One fetched table of rates, expressed against `base`, plus when it was fetched.
///
/// Serialized as `{"timestamp": ..., "base": ..., "rates": {...}}` where
/// `timestamp` is an ISO-8601 local datetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSnapshot {
    pub timestamp: NaiveDateTime,
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl ExchangeRateSnapshot {
    /// Builds a snapshot keeping only supported, strictly positive rates.
    /// A supported base always maps to exactly 1.0.
    pub fn new(base: &str, rates: HashMap<String, f64>, timestamp: NaiveDateTime) -> Self {
        let mut snapshot = Self {
            timestamp,
            base: base.to_string(),
            rates,
        };
        snapshot.sanitize();
        snapshot
    }

    /// Re-applies the snapshot invariants, e.g. after loading from disk.
    pub fn sanitize(&mut self) {
        self.rates.retain(|code, rate| {
            let keep = is_supported(code) && rate.is_finite() && *rate > 0.0;
            if !keep {
                debug!("Dropping rate {code}={rate} from snapshot");
            }
            keep
        });
        if is_supported(&self.base) {
            self.rates.insert(self.base.clone(), 1.0);
        }
    }

    /// Elapsed time since the fetch; future timestamps count as zero.
    pub fn age(&self, now: NaiveDateTime) -> Duration {
        (now - self.timestamp).max(Duration::zero())
    }

    pub fn is_fresh(&self, now: NaiveDateTime, window: Duration) -> bool {
        self.age(now) < window
    }

    /// Rates re-expressed against `base`, or `None` when the snapshot lacks it.
    pub fn rates_for(&self, base: &str) -> Option<HashMap<String, f64>> {
        if base == self.base {
            return Some(self.rates.clone());
        }
        let base_rate = *self.rates.get(base)?;
        let mut rebased: HashMap<String, f64> = self
            .rates
            .iter()
            .map(|(code, rate)| (code.clone(), rate / base_rate))
            .collect();
        rebased.insert(base.to_string(), 1.0);
        Some(rebased)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Human readable relative age: "Just now", "5 minutes ago", "1 hour ago", "3 days ago".
pub fn humanize_age(age: Duration) -> String {
    let seconds = age.num_seconds();
    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3600 {
        plural(age.num_minutes(), "minute")
    } else if seconds < 86_400 {
        plural(age.num_hours(), "hour")
    } else {
        plural(age.num_days(), "day")
    }
}
