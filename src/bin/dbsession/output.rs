//! Result formatting for CLI output

use crate::OutputFormat;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use rust_db_session::{DatabaseInfo, TabularResult};

const NULL_MARKER: &str = "NULL";

/// Render a tabular result in the requested format
pub fn render(result: &TabularResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(result),
        OutputFormat::Json => render_json(result),
        OutputFormat::Csv => render_csv(result),
    }
}

fn render_table(result: &TabularResult) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        result
            .columns
            .iter()
            .map(|c| Cell::new(c).fg(Color::Green))
            .collect::<Vec<_>>(),
    );

    for index in 0..result.len() {
        let cells: Vec<&str> = result
            .row_values(index)
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.unwrap_or(NULL_MARKER))
            .collect();
        table.add_row(cells);
    }

    format!("{}\n({} row(s))\n", table, result.len())
}

fn render_json(result: &TabularResult) -> String {
    let json = serde_json::to_string_pretty(result)
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    format!("{}\n", json)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(result: &TabularResult) -> String {
    let mut out = String::new();
    let header: Vec<String> = result.columns.iter().map(|c| csv_field(c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for index in 0..result.len() {
        let line: Vec<String> = result
            .row_values(index)
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.map(csv_field).unwrap_or_default())
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Human-readable summary of the resolved settings, credential masked
pub fn describe(info: &DatabaseInfo) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["setting", "value"]);
    table.add_row(vec!["name", info.get_name()]);
    table.add_row(vec!["url", info.get_url()]);
    table.add_row(vec!["user", info.get_user()]);
    table.add_row(vec!["password", info.masked_password()]);
    table.add_row(vec!["mode".to_string(), info.get_mode().to_string()]);
    table.add_row(vec![
        "cooldown".to_string(),
        format!("{}s", info.get_cooldown().as_secs()),
    ]);
    table.to_string()
}
