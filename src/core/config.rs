use crate::core::currency::{BASE_CURRENCY, is_supported, normalize_code};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// `cache_path` value that keeps the snapshot in memory only.
pub const MEMORY_CACHE: &str = ":memory:";

pub const DEFAULT_PRIMARY_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_BACKUP_URL: &str = "https://open.er-api.com/v6/latest";

fn default_timeout_secs() -> u64 {
    5
}

fn default_freshness_hours() -> u64 {
    6
}

fn default_base_currency() -> String {
    BASE_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    fn with_url(base_url: &str) -> Self {
        ProviderConfig {
            base_url: base_url.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub primary: ProviderConfig,
    pub backup: Option<ProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            primary: ProviderConfig::with_url(DEFAULT_PRIMARY_URL),
            backup: Some(ProviderConfig::with_url(DEFAULT_BACKUP_URL)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: u64,
    #[serde(default)]
    pub cache_path: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            freshness_hours: default_freshness_hours(),
            cache_path: None,
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when it does not exist.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "spendfx", "spendfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "spendfx", "spendfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Where the snapshot lives; `None` means memory only.
    pub fn resolved_cache_path(&self) -> Result<Option<PathBuf>> {
        match self.cache_path.as_deref() {
            Some(MEMORY_CACHE) => Ok(None),
            Some(custom_path) => Ok(Some(PathBuf::from(custom_path))),
            None => Ok(Some(Self::default_data_path()?.join("exchange_rates.json"))),
        }
    }

    /// Freshness window in hours; values beyond chrono's range clamp to the maximum.
    pub fn freshness_window(&self) -> chrono::Duration {
        i64::try_from(self.freshness_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Normalises the base currency and rejects values the service cannot honour.
    pub fn validate(mut self) -> Result<Self> {
        self.base_currency = normalize_code(&self.base_currency);
        if !is_supported(&self.base_currency) {
            bail!("Unsupported base_currency: {}", self.base_currency);
        }
        if i64::try_from(self.freshness_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .is_none()
        {
            bail!("freshness_hours out of range: {}", self.freshness_hours);
        }
        Ok(self)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        let config = config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
