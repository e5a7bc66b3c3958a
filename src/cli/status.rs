use super::ui;
use crate::service::ExchangeRateService;
use anyhow::Result;

pub async fn display_status(service: &ExchangeRateService) -> Result<()> {
    println!(
        "{} {}",
        ui::style_text("Rate cache:", ui::StyleType::Label),
        service.cache_location()
    );
    match service.get_cache_age().await {
        Some(age) => println!(
            "{} {}",
            ui::style_text("Last updated:", ui::StyleType::Label),
            ui::style_text(&age, ui::StyleType::Value)
        ),
        None => println!(
            "{}",
            ui::style_text(
                "No cached exchange rates yet; run `spendfx rates --refresh`",
                ui::StyleType::Warning
            )
        ),
    }
    Ok(())
}
