// Reshaping operations - pure functions from Table to Table.
// Each validates fully before producing output; on error the input is
// untouched and nothing is committed.

use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::formula;
use crate::table::{Row, Table};
use crate::value::Value;

/// Name of the leading column that transpose adds to hold the original
/// column names.
pub const TRANSPOSE_FIELD_COLUMN: &str = "field";

/// A reshaping request: operation kind plus its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Transpose,
    Clean,
    RenameColumn {
        old: String,
        new: String,
    },
    ReplaceValue {
        column: String,
        from: Value,
        to: Value,
    },
    /// `column` of None derives a name from the formula text.
    ComputeColumn {
        formula: String,
        column: Option<String>,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transpose => "transpose",
            Self::Clean => "clean",
            Self::RenameColumn { .. } => "rename",
            Self::ReplaceValue { .. } => "replace",
            Self::ComputeColumn { .. } => "compute",
        }
    }

    /// Human-readable summary for the history log.
    pub fn label(&self) -> String {
        match self {
            Self::Transpose => "Transpose table".to_string(),
            Self::Clean => "Clean empty rows and blanks".to_string(),
            Self::RenameColumn { old, new } => format!("Rename column '{old}' to '{new}'"),
            Self::ReplaceValue { column, from, to } => format!(
                "Replace '{}' with '{}' in column '{}'",
                from.display(),
                to.display(),
                column
            ),
            Self::ComputeColumn { formula, column } => {
                let name = column
                    .clone()
                    .unwrap_or_else(|| derived_column_name(formula));
                format!("Compute column '{name}' = {formula}")
            }
        }
    }

    pub fn apply(&self, table: &Table) -> Result<Table, EngineError> {
        match self {
            Self::Transpose => transpose(table),
            Self::Clean => clean(table),
            Self::RenameColumn { old, new } => rename_column(table, old, new),
            Self::ReplaceValue { column, from, to } => replace_value(table, column, from, to),
            Self::ComputeColumn { formula, column } => {
                compute_column(table, formula, column.as_deref())
            }
        }
    }
}

/// Turn rows into columns. The first column is the designated header
/// column: its cell values become the new column names, and the original
/// column names become the values of a new leading `field` column.
pub fn transpose(table: &Table) -> Result<Table, EngineError> {
    if table.row_count() == 0 || table.columns().is_empty() {
        return Err(EngineError::EmptyTable);
    }

    let header_column = &table.columns()[0];

    let mut columns = Vec::with_capacity(table.row_count() + 1);
    columns.push(TRANSPOSE_FIELD_COLUMN.to_string());
    for row in table.rows() {
        let header = row.get(header_column).unwrap_or(&Value::Null).display();
        columns.push(header);
    }

    let mut rows = Vec::with_capacity(table.columns().len().saturating_sub(1));
    for name in &table.columns()[1..] {
        let mut out: Row = FxHashMap::default();
        out.insert(
            TRANSPOSE_FIELD_COLUMN.to_string(),
            Value::Text(name.clone()),
        );
        for (idx, row) in table.rows().iter().enumerate() {
            let cell = row.get(name).cloned().unwrap_or(Value::Null);
            out.insert(columns[idx + 1].clone(), cell);
        }
        rows.push(out);
    }

    // Duplicate header-column values surface here as DuplicateColumn
    Table::new(columns, rows)
}

/// Trim whitespace in text cells, normalize blank text to Null, and drop
/// rows whose cells are all null. Idempotent.
pub fn clean(table: &Table) -> Result<Table, EngineError> {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|(name, value)| (name.clone(), normalize_cell(value)))
                .collect::<Row>()
        })
        .filter(|row: &Row| row.values().any(|v| !v.is_blank()))
        .collect();

    Table::new(table.columns().to_vec(), rows)
}

fn normalize_cell(value: &Value) -> Value {
    match value {
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::Text(trimmed.to_string())
            }
        }
        other => other.clone(),
    }
}

pub fn rename_column(table: &Table, old: &str, new: &str) -> Result<Table, EngineError> {
    table.with_column_renamed(old, new)
}

/// Replace every cell in `column` equal to `from` with `to`.
pub fn replace_value(
    table: &Table,
    column: &str,
    from: &Value,
    to: &Value,
) -> Result<Table, EngineError> {
    if !table.has_column(column) {
        return Err(EngineError::ColumnNotFound(column.to_string()));
    }

    let values = table
        .rows()
        .iter()
        .map(|row| {
            let cell = row.get(column).unwrap_or(&Value::Null);
            if cell == from {
                to.clone()
            } else {
                cell.clone()
            }
        })
        .collect();

    table.with_column(column, values)
}

pub fn compute_column(
    table: &Table,
    formula: &str,
    column: Option<&str>,
) -> Result<Table, EngineError> {
    let name = match column {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => derived_column_name(formula),
    };
    formula::evaluate(formula, table, &name)
}

/// Fallback name for a computed column, derived from the formula text
/// with operators spelled out: "qty * price" -> "qty_times_price".
fn derived_column_name(formula: &str) -> String {
    let mut name = String::new();
    for c in formula.chars() {
        match c {
            '+' => name.push_str("_plus_"),
            '-' => name.push_str("_minus_"),
            '*' => name.push_str("_times_"),
            '/' => name.push_str("_div_"),
            '(' | ')' | ' ' | '\t' => {}
            _ => name.push(c),
        }
    }
    if name.is_empty() {
        "computed".to_string()
    } else {
        name
    }
}
