use super::ui::{self, StyleType};
use crate::core::{RateCache, RateResolution, RateSource, fallback, resolve_rates};
use anyhow::Result;
use comfy_table::Cell;
use std::sync::Arc;

/// Renders the resolved rate table.
pub fn display_as_table(resolution: &RateResolution) -> String {
    let table = &resolution.table;
    let mut out = ui::new_styled_table();
    out.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (per 1 {})", table.base())),
    ]);

    for (code, rate) in table.iter() {
        out.add_row(vec![
            Cell::new(code),
            ui::optional_cell(fallback::display_name(code)),
            ui::rate_cell(rate),
        ]);
    }

    let heading = match (resolution.source, table.as_of()) {
        (RateSource::Live, Some(as_of)) => {
            format!("Live rates as of {}", as_of.format("%Y-%m-%d %H:%M UTC"))
        }
        (RateSource::Live, None) => "Live rates".to_string(),
        (RateSource::Fallback, _) => "Fallback rates".to_string(),
    };

    let mut output = String::new();
    if let Some(error) = &resolution.error {
        output.push_str(&ui::style_text(&format!("Error: {error}"), StyleType::Error));
        output.push('\n');
    }
    output.push_str(&format!(
        "{}\n\n{}",
        ui::style_text(&heading, StyleType::Result),
        out
    ));
    output
}

pub async fn run(cache: Arc<RateCache>) -> Result<()> {
    let resolution = resolve_rates(&cache).await;
    println!("{}", display_as_table(&resolution));
    Ok(())
}
