use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub const TITLE: &str = "Currency Converter";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Error,
    Subtle,
    Selected,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().white().on_magenta(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red().bold(),
        StyleType::Subtle => style(text).dim(),
        StyleType::Selected => style(text).magenta().bold(),
    };
    styled.to_string()
}

/// Title banner shown at the top of every screen.
pub fn title() -> String {
    style_text(&format!(" {TITLE} "), StyleType::Title)
}

/// Creates a spinner that only advances when `tick` is called.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷ ")
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<&str>` into a `Cell`. `None` is displayed as "N/A".
pub fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or(Cell::new("N/A").fg(Color::DarkGrey), Cell::new)
}
