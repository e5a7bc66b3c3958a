use chrono::{Duration, Local};
use spendfx::core::SUPPORTED_CURRENCIES;
use spendfx::core::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const UNREACHABLE: &str = "http://127.0.0.1:1";

    pub const USD_RATES: &str = r#"{
        "base": "USD",
        "date": "2026-10-19",
        "rates": {
            "USD": 1, "PHP": 56.123, "EUR": 0.9213, "GBP": 0.7871, "JPY": 149.52,
            "KRW": 1387.45, "SGD": 1.3412, "AUD": 1.5234, "CAD": 1.3689, "INR": 83.21,
            "CHF": 0.8812, "MXN": 18.02
        }
    }"#;

    pub async fn create_rates_server(status: u16, body: &str, expected_calls: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_config(dir: &Path, primary: &str, backup: &str) -> (PathBuf, PathBuf) {
    let cache_path = dir.join("cache").join("exchange_rates.json");
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
base_currency: "USD"
freshness_hours: 6
cache_path: "{}"
providers:
  primary:
    base_url: "{}"
    timeout_secs: 2
  backup:
    base_url: "{}"
    timeout_secs: 2
"#,
        cache_path.display(),
        primary,
        backup
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    (config_path, cache_path)
}

fn write_cache(cache_path: &Path, age: Duration, rates: &str) {
    let timestamp = (Local::now().naive_local() - age).format("%Y-%m-%dT%H:%M:%S%.6f");
    fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
    fs::write(
        cache_path,
        format!(r#"{{"timestamp": "{timestamp}", "base": "USD", "rates": {rates}}}"#),
    )
    .unwrap();
}

fn service_for(config_path: &Path) -> spendfx::service::ExchangeRateService {
    let config = AppConfig::load_from_path(config_path).expect("config");
    spendfx::build_service(&config).expect("service")
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_rates_server(200, test_utils::USD_RATES, 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), &mock_server.uri(), test_utils::UNREACHABLE);

    let result = spendfx::run_command(
        spendfx::AppCommand::Rates {
            base: None,
            refresh: false,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cache_path).unwrap()).unwrap();
    assert_eq!(raw["base"], "USD");
    assert_eq!(raw["rates"]["PHP"], 56.123);
    assert_eq!(raw["rates"].as_object().unwrap().len(), 10);
    assert!(raw["rates"].get("CHF").is_none());

    // Second command is served from the fresh cache; the mock expects a single call
    let result = spendfx::run_command(
        spendfx::AppCommand::Convert {
            amount: 100.0,
            from: "USD".to_string(),
            to: "PHP".to_string(),
            strict: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_stale_cache_triggers_network_call() {
    let mock_server = test_utils::create_rates_server(200, test_utils::USD_RATES, 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), &mock_server.uri(), test_utils::UNREACHABLE);
    write_cache(&cache_path, Duration::hours(7), r#"{"PHP": 50.0}"#);

    let service = service_for(&config_path);
    let rates = service.get_rates(None, false).await;
    info!(?rates, "Rates after stale cache");

    assert_eq!(rates["PHP"], 56.123);
    assert_eq!(service.get_cache_age().await.as_deref(), Some("Just now"));
}

#[test_log::test(tokio::test)]
async fn test_fresh_cache_skips_network() {
    let mock_server = test_utils::create_rates_server(200, test_utils::USD_RATES, 0).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), &mock_server.uri(), test_utils::UNREACHABLE);
    write_cache(&cache_path, Duration::hours(2), r#"{"PHP": 50.0, "EUR": 0.9}"#);

    let service = service_for(&config_path);
    assert_eq!(service.convert(10.0, "USD", "PHP").await, 500.0);
    assert_eq!(service.get_exchange_rate("USD", "EUR").await, 0.9);
    assert_eq!(service.get_cache_age().await.as_deref(), Some("2 hours ago"));
}

#[test_log::test(tokio::test)]
async fn test_backup_used_when_primary_fails() {
    let primary = test_utils::create_rates_server(503, "unavailable", 1).await;
    let backup = test_utils::create_rates_server(200, test_utils::USD_RATES, 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) = write_config(dir.path(), &primary.uri(), &backup.uri());

    let service = service_for(&config_path);
    let rates = service.get_rates(None, false).await;

    assert_eq!(rates["JPY"], 149.52);
    assert!(cache_path.exists());
}

#[test_log::test(tokio::test)]
async fn test_stale_cache_used_when_all_providers_fail() {
    let primary = test_utils::create_rates_server(500, "", 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), &primary.uri(), test_utils::UNREACHABLE);
    write_cache(&cache_path, Duration::days(2), r#"{"PHP": 50.0}"#);

    let service = service_for(&config_path);
    let rates = service.get_rates(None, false).await;

    assert_eq!(rates["PHP"], 50.0);
    assert_eq!(rates["USD"], 1.0);
    assert_eq!(service.get_cache_age().await.as_deref(), Some("2 days ago"));
}

#[test_log::test(tokio::test)]
async fn test_no_cache_and_no_network_gives_parity() {
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), test_utils::UNREACHABLE, test_utils::UNREACHABLE);

    let service = service_for(&config_path);
    let rates = service.get_rates(None, false).await;

    assert_eq!(rates.len(), SUPPORTED_CURRENCIES.len());
    for code in SUPPORTED_CURRENCIES {
        assert_eq!(rates[code], 1.0, "{code}");
    }
    assert!(!cache_path.exists());
    assert_eq!(service.get_cache_age().await, None);

    let formatted = service.get_all_rates_formatted("USD").await;
    assert_eq!(formatted["USD"], (1.0, "1.00 USD".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_corrupt_cache_is_refetched() {
    let mock_server = test_utils::create_rates_server(200, test_utils::USD_RATES, 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), &mock_server.uri(), test_utils::UNREACHABLE);
    fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
    fs::write(&cache_path, "{\"timestamp\": 12").unwrap();

    let service = service_for(&config_path);
    assert_eq!(service.get_cache_age().await, None);

    let rates = service.get_rates(None, false).await;
    assert_eq!(rates["INR"], 83.21);
    assert!(service.get_cache_age().await.is_some());
}

#[test_log::test(tokio::test)]
async fn test_conversion_properties() {
    let mock_server = test_utils::create_rates_server(200, test_utils::USD_RATES, 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, _) = write_config(dir.path(), &mock_server.uri(), test_utils::UNREACHABLE);
    let service = service_for(&config_path);

    let php = service.convert(100.0, "USD", "PHP").await;
    let back = service.convert(php, "PHP", "USD").await;
    assert!((back - 100.0).abs() <= 0.02);

    for code in SUPPORTED_CURRENCIES {
        assert_eq!(service.convert(42.42, code, code).await, 42.42);
    }

    let formatted = service.get_all_rates_formatted("USD").await;
    assert_eq!(formatted["USD"], (1.0, "1.00 USD".to_string()));
    assert_eq!(formatted["GBP"], (0.7871, "0.7871 GBP".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_strict_convert_rejects_unsupported_currency() {
    let dir = TempDir::new().unwrap();
    let (config_path, _) =
        write_config(dir.path(), test_utils::UNREACHABLE, test_utils::UNREACHABLE);

    let result = spendfx::run_command(
        spendfx::AppCommand::Convert {
            amount: 10.0,
            from: "USD".to_string(),
            to: "CHF".to_string(),
            strict: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "Unsupported currency: CHF"
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_config_path_fails() {
    let dir = TempDir::new().unwrap();
    let result = spendfx::run_command(
        spendfx::AppCommand::Status,
        Some(dir.path().join("missing.yaml").to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_unsupported_base_currency_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), test_utils::UNREACHABLE, test_utils::UNREACHABLE);
    let content = fs::read_to_string(&config_path)
        .unwrap()
        .replace("base_currency: \"USD\"", "base_currency: \"xyz\"");
    fs::write(&config_path, content).unwrap();

    let result = spendfx::run_command(
        spendfx::AppCommand::Rates {
            base: None,
            refresh: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Unsupported base_currency: XYZ"));
    assert!(!cache_path.exists());
}

#[test_log::test(tokio::test)]
async fn test_rates_for_unsupported_base_keep_usd_snapshot() {
    let mock_server = test_utils::create_rates_server(200, test_utils::USD_RATES, 1).await;
    let dir = TempDir::new().unwrap();
    let (config_path, cache_path) =
        write_config(dir.path(), &mock_server.uri(), test_utils::UNREACHABLE);

    let service = service_for(&config_path);
    let rates = service.get_rates(Some("XYZ"), true).await;
    assert_eq!(rates.len(), SUPPORTED_CURRENCIES.len());
    assert!(!rates.contains_key("XYZ"));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cache_path).unwrap()).unwrap();
    assert_eq!(raw["base"], "USD");
    assert!(raw["rates"].get("XYZ").is_none());
}
