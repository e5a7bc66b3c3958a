pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::config::AppConfig;
use crate::service::ExchangeRateService;
use crate::store::{JsonFileStore, MemoryStore, SnapshotStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        base: Option<String>,
        refresh: bool,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
        strict: bool,
    },
    Rate {
        from: String,
        to: String,
    },
    Status,
}

/// Wires the provider chain and snapshot store described by `config`.
pub fn build_service(config: &AppConfig) -> Result<ExchangeRateService> {
    let provider = Arc::new(providers::from_config(&config.providers)?);
    let store: Arc<dyn SnapshotStore> = match config.resolved_cache_path()? {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    debug!("Using rate cache at {}", store.location());

    Ok(ExchangeRateService::new(provider, store)
        .with_base_currency(&config.base_currency)
        .with_freshness(config.freshness_window()))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("spendfx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config)?;

    match command {
        AppCommand::Rates { base, refresh } => {
            cli::rates::display_rates(&service, base.as_deref(), refresh).await
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            strict,
        } => cli::convert::display_conversion(&service, amount, &from, &to, strict).await,
        AppCommand::Rate { from, to } => cli::convert::display_rate(&service, &from, &to).await,
        AppCommand::Status => cli::status::display_status(&service).await,
    }
}
