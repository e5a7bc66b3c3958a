use super::ui;
use crate::core::currency::{SUPPORTED_CURRENCIES, currency_info, normalize_code};
use crate::service::{ExchangeRateService, FormattedRate};
use anyhow::Result;
use comfy_table::Cell;
use std::collections::BTreeMap;

/// Renders the formatted rate table in display order.
pub fn rates_table(base: &str, rates: &BTreeMap<String, FormattedRate>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell(&format!("Per 1 {base}")),
    ]);

    for code in SUPPORTED_CURRENCIES {
        let Some((_, display)) = rates.get(code) else {
            continue;
        };
        let (name, symbol) = currency_info(code).map_or(("", ""), |info| (info.name, info.symbol));
        table.add_row(vec![
            Cell::new(code),
            Cell::new(name),
            Cell::new(symbol),
            ui::rate_cell(display, code == base),
        ]);
    }

    table.to_string()
}

pub async fn display_rates(
    service: &ExchangeRateService,
    base: Option<&str>,
    refresh: bool,
) -> Result<()> {
    let base = base
        .map(normalize_code)
        .unwrap_or_else(|| service.base_currency().to_string());

    if refresh {
        let spinner = ui::new_spinner("Refreshing exchange rates...");
        service.get_rates(None, true).await;
        spinner.finish_and_clear();
    }

    let rates = service.get_all_rates_formatted(&base).await;

    println!(
        "{}",
        ui::style_text(&format!("Exchange rates ({base})"), ui::StyleType::Title)
    );
    println!("{}", rates_table(&base, &rates));

    let age = service
        .get_cache_age()
        .await
        .unwrap_or_else(|| "never (showing 1:1 rates)".to_string());
    println!(
        "{} {}",
        ui::style_text("Last updated:", ui::StyleType::Label),
        ui::style_text(&age, ui::StyleType::Subtle)
    );
    Ok(())
}
