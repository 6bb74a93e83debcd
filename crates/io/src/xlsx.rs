// Excel import (xlsx, xls, ods). One-way conversion of the first
// worksheet; the first row is the header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use retable_engine::table::Table;
use retable_engine::value::Value;

use crate::error::LoadError;
use crate::table_from_grid;

pub fn import(path: &Path) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Io(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::Parse("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Parse(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(row) => row.iter().map(header_text).collect::<Vec<String>>(),
        None => return Err(LoadError::Parse("sheet has no header row".to_string())),
    };

    let grid = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    table_from_grid(headers, grid)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => cell_from_data(other).display(),
    }
}

fn cell_from_data(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => {
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Bool(*b),
        // Keep cell errors visible rather than silently nulling them
        Data::Error(e) => Value::Text(format!("#{:?}", e)),
        // Excel serial date; callers see the raw serial number
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}
