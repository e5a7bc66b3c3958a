use super::ui;
use crate::core::currency::{format_amount, normalize_code};
use crate::service::ExchangeRateService;
use anyhow::Result;

/// One line summary, e.g. `$100.00 = ₱5,612.30`.
pub fn conversion_line(amount: f64, from: &str, converted: f64, to: &str) -> String {
    format!(
        "{} = {}",
        format_amount(amount, from),
        format_amount(converted, to)
    )
}

pub async fn display_conversion(
    service: &ExchangeRateService,
    amount: f64,
    from: &str,
    to: &str,
    strict: bool,
) -> Result<()> {
    let from = normalize_code(from);
    let to = normalize_code(to);

    let (converted, rate) = if strict {
        (
            service.try_convert(amount, &from, &to).await?,
            service.try_get_exchange_rate(&from, &to).await?,
        )
    } else {
        (
            service.convert(amount, &from, &to).await,
            service.get_exchange_rate(&from, &to).await,
        )
    };

    println!(
        "{}",
        ui::style_text(
            &conversion_line(amount, &from, converted, &to),
            ui::StyleType::Value
        )
    );
    println!(
        "{}",
        ui::style_text(&format!("1 {from} = {rate:.4} {to}"), ui::StyleType::Subtle)
    );
    Ok(())
}

pub async fn display_rate(service: &ExchangeRateService, from: &str, to: &str) -> Result<()> {
    let from = normalize_code(from);
    let to = normalize_code(to);
    let rate = service.get_exchange_rate(&from, &to).await;
    println!(
        "{} {}",
        ui::style_text(&format!("1 {from} ="), ui::StyleType::Label),
        ui::style_text(&format!("{rate:.4} {to}"), ui::StyleType::Value)
    );
    Ok(())
}
