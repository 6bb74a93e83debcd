use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::value::Value;

/// One table row: a mapping from column name to cell value.
///
/// Invariant (enforced by `Table::new`): the key set equals the table's
/// declared columns exactly. Column order lives only in the column list.
pub type Row = FxHashMap<String, Value>;

/// Immutable tabular value: ordered unique column names plus ordered rows.
///
/// Every mutator returns a new `Table`; the receiver is never modified.
/// This is what makes undo snapshots safe to hold — no aliasing between
/// history entries and the current table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Construct a table, validating the schema invariant.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, EngineError> {
        {
            let mut seen: FxHashMap<&str, ()> = FxHashMap::default();
            for name in &columns {
                if seen.insert(name.as_str(), ()).is_some() {
                    return Err(EngineError::DuplicateColumn(name.clone()));
                }
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                let detail = schema_detail(&columns, row);
                return Err(EngineError::SchemaMismatch { row: idx, detail });
            }
            for name in &columns {
                if !row.contains_key(name) {
                    return Err(EngineError::SchemaMismatch {
                        row: idx,
                        detail: format!("missing key '{name}'"),
                    });
                }
            }
        }

        Ok(Self { columns, rows })
    }

    /// Empty table with no columns and no rows.
    pub fn empty() -> Self {
        Self { columns: Vec::new(), rows: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Cell accessor. None if the row index or column name is out of range.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Rename one column, preserving order.
    pub fn with_column_renamed(&self, old: &str, new: &str) -> Result<Self, EngineError> {
        if !self.has_column(old) {
            return Err(EngineError::ColumnNotFound(old.to_string()));
        }
        if self.has_column(new) {
            return Err(EngineError::DuplicateColumn(new.to_string()));
        }

        let columns = self
            .columns
            .iter()
            .map(|c| if c == old { new.to_string() } else { c.clone() })
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut next = row.clone();
                if let Some(value) = next.remove(old) {
                    next.insert(new.to_string(), value);
                }
                next
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Replace an existing column's values, or append a new column.
    /// `values` must have exactly one entry per row.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Self, EngineError> {
        if values.len() != self.rows.len() {
            return Err(EngineError::SchemaMismatch {
                row: values.len().min(self.rows.len()),
                detail: format!(
                    "column '{}' has {} values for {} rows",
                    name,
                    values.len(),
                    self.rows.len()
                ),
            });
        }

        let mut columns = self.columns.clone();
        if !self.has_column(name) {
            columns.push(name.to_string());
        }

        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut next = row.clone();
                next.insert(name.to_string(), value);
                next
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Serialize as a JSON array of objects, keys in column order.
    pub fn to_json(&self) -> serde_json::Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut object = serde_json::Map::new();
                for name in &self.columns {
                    let value = row.get(name).map(Value::to_json).unwrap_or_default();
                    object.insert(name.clone(), value);
                }
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(records)
    }
}

fn schema_detail(columns: &[String], row: &Row) -> String {
    for name in columns {
        if !row.contains_key(name) {
            return format!("missing key '{name}'");
        }
    }
    for key in row.keys() {
        if !columns.iter().any(|c| c == key) {
            return format!("unexpected key '{key}'");
        }
    }
    format!("expected {} keys, found {}", columns.len(), row.len())
}


#[cfg(test)]
mod tests {
    use super::fixtures::{orders, row};
    use super::*;

    #[test]
    fn test_new_validates_row_keys() {
        let err = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![row(&[("a", Value::Number(1.0))])],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::SchemaMismatch { row: 0, .. }));
    }

    #[test]
    fn test_new_rejects_extra_keys() {
        let err = Table::new(
            vec!["a".to_string()],
            vec![row(&[("a", Value::Number(1.0)), ("b", Value::Number(2.0))])],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::SchemaMismatch { row: 0, .. }));
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        let err = Table::new(vec!["a".to_string(), "a".to_string()], Vec::new()).unwrap_err();
        assert_eq!(err, EngineError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_rename_preserves_order_and_values() {
        let table = orders();
        let renamed = table.with_column_renamed("qty", "quantity").unwrap();
        assert_eq!(renamed.columns(), ["quantity", "price"]);
        assert_eq!(renamed.get(0, "quantity"), Some(&Value::Number(2.0)));
        assert_eq!(renamed.get(0, "qty"), None);
        // the receiver is untouched
        assert_eq!(table.columns(), ["qty", "price"]);
    }

    #[test]
    fn test_rename_errors() {
        let table = orders();
        assert_eq!(
            table.with_column_renamed("cost", "x").unwrap_err(),
            EngineError::ColumnNotFound("cost".to_string())
        );
        assert_eq!(
            table.with_column_renamed("qty", "price").unwrap_err(),
            EngineError::DuplicateColumn("price".to_string())
        );
    }

    #[test]
    fn test_with_column_appends_and_replaces() {
        let table = orders();
        let appended = table
            .with_column("total", vec![Value::Number(10.0), Value::Number(12.0)])
            .unwrap();
        assert_eq!(appended.columns(), ["qty", "price", "total"]);
        assert_eq!(appended.get(1, "total"), Some(&Value::Number(12.0)));

        let replaced = appended
            .with_column("total", vec![Value::Number(0.0), Value::Number(0.0)])
            .unwrap();
        assert_eq!(replaced.columns(), ["qty", "price", "total"]);
        assert_eq!(replaced.get(0, "total"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_with_column_length_mismatch() {
        let table = orders();
        let err = table.with_column("total", vec![Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err, EngineError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_to_json_preserves_column_order() {
        let table = orders();
        let json = serde_json::to_string(&table.to_json()).unwrap();
        assert_eq!(json, r#"[{"qty":2.0,"price":5.0},{"qty":3.0,"price":4.0}]"#);
    }
}
