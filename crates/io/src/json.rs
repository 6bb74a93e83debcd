// JSON import/export - tables as arrays of objects

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use retable_engine::table::{Row, Table};
use retable_engine::value::Value;

use crate::error::LoadError;

/// Import a JSON array of objects. Column order is first-appearance order
/// across the records; keys missing from a record become Null so the
/// table invariant holds.
pub fn import(path: &Path) -> Result<Table, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io(e.to_string()))?;
    import_from_str(&content)
}

pub fn import_from_str(content: &str) -> Result<Table, LoadError> {
    let json: serde_json::Value =
        serde_json::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?;

    let records = match json {
        serde_json::Value::Array(records) => records,
        _ => return Err(LoadError::Parse("expected a JSON array of objects".to_string())),
    };

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());

    for (idx, record) in records.into_iter().enumerate() {
        let object = match record {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(LoadError::Parse(format!(
                    "record {} is not an object: {}",
                    idx, other
                )))
            }
        };

        for key in object.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(object);
    }

    let mut rows: Vec<Row> = Vec::with_capacity(objects.len());
    for (idx, object) in objects.iter().enumerate() {
        let mut row = Row::default();
        for name in &columns {
            let value = match object.get(name) {
                Some(json) => Value::from_json(json).ok_or_else(|| {
                    LoadError::Parse(format!(
                        "record {}, key '{}': nested values are not supported",
                        idx, name
                    ))
                })?,
                None => Value::Null,
            };
            row.insert(name.clone(), value);
        }
        rows.push(row);
    }

    Table::new(columns, rows).map_err(LoadError::from)
}

/// Export as a pretty-printed JSON array of objects, keys in column order.
pub fn export(table: &Table, path: &Path) -> Result<(), LoadError> {
    let file = File::create(path).map_err(|e| LoadError::Io(e.to_string()))?;
    write_to(table, BufWriter::new(file))
}

pub fn write_to<W: Write>(table: &Table, writer: W) -> Result<(), LoadError> {
    serde_json::to_writer_pretty(writer, &table.to_json())
        .map_err(|e| LoadError::Io(e.to_string()))
}
