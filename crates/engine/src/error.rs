use std::fmt;

/// Engine error taxonomy. Every variant is recoverable by the caller: a
/// failed operation leaves the current table and history untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A row's key set differs from the declared columns.
    SchemaMismatch { row: usize, detail: String },
    /// Formula text could not be tokenized or parsed.
    InvalidFormula(String),
    /// Formula identifier is neither a column name nor a numeric literal.
    UnknownReference(String),
    /// A cell could not be coerced to a number during evaluation.
    NonNumericOperand { column: String, row: usize },
    /// Division by zero during evaluation.
    DivisionByZero { row: usize },
    /// Named column does not exist.
    ColumnNotFound(String),
    /// Target column name is already taken.
    DuplicateColumn(String),
    /// Operation requires at least one row.
    EmptyTable,
    /// Undo requested with an empty history.
    NothingToUndo,
}

impl EngineError {
    /// Stable machine-readable error kind for the serialized boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::InvalidFormula(_) => "invalid_formula",
            Self::UnknownReference(_) => "unknown_reference",
            Self::NonNumericOperand { .. } => "non_numeric_operand",
            Self::DivisionByZero { .. } => "division_by_zero",
            Self::ColumnNotFound(_) => "column_not_found",
            Self::DuplicateColumn(_) => "duplicate_column",
            Self::EmptyTable => "empty_table",
            Self::NothingToUndo => "nothing_to_undo",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMismatch { row, detail } => {
                write!(f, "row {row} does not match the declared columns: {detail}")
            }
            Self::InvalidFormula(msg) => write!(f, "invalid formula: {msg}"),
            Self::UnknownReference(name) => {
                write!(f, "'{name}' is neither a column nor a number")
            }
            Self::NonNumericOperand { column, row } => {
                write!(f, "column '{column}', row {row}: value is not numeric")
            }
            Self::DivisionByZero { row } => write!(f, "division by zero at row {row}"),
            Self::ColumnNotFound(name) => write!(f, "column '{name}' does not exist"),
            Self::DuplicateColumn(name) => write!(f, "column '{name}' already exists"),
            Self::EmptyTable => write!(f, "table has no rows"),
            Self::NothingToUndo => write!(f, "nothing to undo"),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(EngineError::EmptyTable.kind(), "empty_table");
        assert_eq!(EngineError::NothingToUndo.kind(), "nothing_to_undo");
        assert_eq!(
            EngineError::DivisionByZero { row: 3 }.kind(),
            "division_by_zero"
        );
        assert_eq!(
            EngineError::ColumnNotFound("qty".to_string()).kind(),
            "column_not_found"
        );
    }

    #[test]
    fn test_display_carries_context() {
        let err = EngineError::NonNumericOperand { column: "name".to_string(), row: 2 };
        assert_eq!(err.to_string(), "column 'name', row 2: value is not numeric");

        let err = EngineError::ColumnNotFound("cost".to_string());
        assert_eq!(err.to_string(), "column 'cost' does not exist");
    }
}
