use serde::Serialize;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;
mod views;

pub use views::{SubmitOutcome, TableView};

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TableView>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(value)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + TableView>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: TableView>(value: &T) -> String {
    let rows = value.rows();
    if rows.is_empty() {
        return String::from("(no rows)");
    }
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };
    table::render_rows(T::HEADERS, &rows, options)
}
