use super::ui::{self, StyleType};
use crate::core::{ConversionRequest, RateCache, convert, resolve_rates};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Converts once without the interactive screens.
pub async fn run(cache: Arc<RateCache>, amount: &str, from: &str, to: &str) -> Result<()> {
    // Bad input is rejected before any rates are requested.
    let request = ConversionRequest::parse(amount, from, to)?;
    info!(?request, "One-shot conversion");

    let pb = ui::new_spinner("Loading currency rates...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    let resolution = resolve_rates(&cache).await;
    pb.finish_and_clear();

    if let Some(error) = &resolution.error {
        eprintln!(
            "{}\nUsing fallback rates.",
            ui::style_text(&format!("Error: {error}"), StyleType::Error)
        );
    }

    let result = convert(&resolution.table, &request)?;
    println!("{}", ui::style_text(&result.to_string(), StyleType::Result));
    Ok(())
}
