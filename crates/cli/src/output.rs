// Table output - aligned terminal grid, or CSV/JSON by file extension

use std::io;
use std::path::Path;

use retable_engine::table::Table;
use retable_engine::value::Value;

/// Widest a column renders in the terminal grid before truncation.
const MAX_COLUMN_WIDTH: usize = 40;

/// Print an aligned text grid to stdout.
pub fn print_grid(table: &Table) {
    let columns = table.columns();
    if columns.is_empty() {
        println!("(empty table)");
        return;
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in table.rows() {
        for (idx, name) in columns.iter().enumerate() {
            let rendered = row.get(name).map(Value::display).unwrap_or_default();
            widths[idx] = widths[idx].max(rendered.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| pad(name, widths[idx]))
        .collect();
    println!("{}", header.join("  "));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));

    for row in table.rows() {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let rendered = row.get(name).map(Value::display).unwrap_or_default();
                pad(&rendered, widths[idx])
            })
            .collect();
        println!("{}", cells.join("  "));
    }

    println!("({} rows)", table.row_count());
}

fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

/// Write the result table: to a file picked by extension when `-o` was
/// given, otherwise CSV on stdout.
pub fn write_result(table: &Table, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => retable_io::export(table, path).map_err(|e| e.to_string()),
        None => retable_io::csv::write_to(table, io::stdout().lock(), b',')
            .map_err(|e| e.to_string()),
    }
}
