//! Core exchange-rate abstractions and types

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use currency::{BASE_CURRENCY, SUPPORTED_CURRENCIES};
pub use error::FxError;
pub use rates::RatesProvider;
pub use snapshot::ExchangeRateSnapshot;
