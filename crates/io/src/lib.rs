// Table I/O - initial-table producers and exporters.
// Every producer yields a value satisfying the Table invariant, or a
// structured LoadError; the engine never sees a half-parsed table.

pub mod csv;
pub mod database;
pub mod error;
pub mod json;
pub mod xlsx;

use std::path::Path;

use retable_engine::table::{Row, Table};
use retable_engine::value::Value;

use error::LoadError;

/// Import a file by extension (csv/tsv/txt, json, xlsx).
pub fn import(path: &Path) -> Result<Table, LoadError> {
    match extension_of(path).as_str() {
        "csv" | "tsv" | "txt" => csv::import(path),
        "json" => json::import(path),
        "xlsx" => xlsx::import(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Export a table by extension (csv/tsv/txt, json).
pub fn export(table: &Table, path: &Path) -> Result<(), LoadError> {
    match extension_of(path).as_str() {
        "csv" | "txt" => csv::export(table, path),
        "tsv" => csv::export_with_delimiter(table, path, b'\t'),
        "json" => json::export(table, path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Build a Table from a raw header record plus value rows, applying the
/// shared import rules: blank headers get positional names, duplicate
/// headers get numeric suffixes, short rows pad with Null, long rows drop
/// the overflow.
pub(crate) fn table_from_grid(
    headers: Vec<String>,
    grid: Vec<Vec<Value>>,
) -> Result<Table, LoadError> {
    let columns = normalize_headers(headers);

    let rows = grid
        .into_iter()
        .map(|mut cells| {
            cells.resize(columns.len(), Value::Null);
            columns
                .iter()
                .cloned()
                .zip(cells)
                .collect::<Row>()
        })
        .collect();

    Table::new(columns, rows).map_err(LoadError::from)
}

fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, header) in raw.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 2;
        while columns.iter().any(|c| *c == name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        columns.push(name);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_headers_blank_and_duplicate() {
        let headers = vec![
            "name".to_string(),
            "".to_string(),
            "name".to_string(),
            " name ".to_string(),
        ];
        assert_eq!(
            normalize_headers(headers),
            ["name", "column_2", "name_2", "name_3"]
        );
    }

    #[test]
    fn test_table_from_grid_pads_short_rows() {
        let table = table_from_grid(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Number(1.0)]],
        )
        .unwrap();
        assert_eq!(table.get(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_table_from_grid_drops_overflow() {
        let table = table_from_grid(
            vec!["a".to_string()],
            vec![vec![Value::Number(1.0), Value::Number(2.0)]],
        )
        .unwrap();
        assert_eq!(table.columns(), ["a"]);
        assert_eq!(table.get(0, "a"), Some(&Value::Number(1.0)));
    }
}
