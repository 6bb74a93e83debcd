// SQLite table loader

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use retable_engine::table::{Row, Table};
use retable_engine::value::Value;

use crate::error::LoadError;

/// Load an entire SQLite table, columns in declared order.
pub fn load_table(path: &Path, table_name: &str) -> Result<Table, LoadError> {
    let conn = Connection::open(path).map_err(|e| LoadError::Database(e.to_string()))?;

    // Identifiers cannot be bound as parameters; quote and escape instead
    let sql = format!("SELECT * FROM \"{}\"", table_name.replace('"', "\"\""));
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| LoadError::Database(format!("table '{}': {}", table_name, e)))?;

    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut result_rows = stmt.query([]).map_err(|e| LoadError::Database(e.to_string()))?;
    while let Some(result_row) = result_rows
        .next()
        .map_err(|e| LoadError::Database(e.to_string()))?
    {
        let mut row = Row::default();
        for (idx, name) in columns.iter().enumerate() {
            let value_ref = result_row
                .get_ref(idx)
                .map_err(|e| LoadError::Database(e.to_string()))?;
            row.insert(name.clone(), cell_from_sqlite(value_ref));
        }
        rows.push(row);
    }

    Table::new(columns, rows).map_err(LoadError::from)
}

/// Names of user tables in the database, for error messages and listings.
pub fn list_tables(path: &Path) -> Result<Vec<String>, LoadError> {
    let conn = Connection::open(path).map_err(|e| LoadError::Database(e.to_string()))?;
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .map_err(|e| LoadError::Database(e.to_string()))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| LoadError::Database(e.to_string()))?
        .collect::<Result<Vec<String>, _>>()
        .map_err(|e| LoadError::Database(e.to_string()))?;
    Ok(names)
}

fn cell_from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Number(n as f64),
        ValueRef::Real(n) => Value::Number(n),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}
