// Formula evaluator - binds identifiers against a table's columns, then
// evaluates the expression once per row

use crate::error::EngineError;
use crate::table::{Row, Table};
use crate::value::Value;

use super::parser::{self, Expr, Op};

/// Expression after identifier resolution: every leaf is a column
/// reference or a literal.
#[derive(Debug, Clone)]
enum BoundExpr {
    Number(f64),
    ColumnRef(String),
    BinaryOp {
        op: Op,
        left: Box<BoundExpr>,
        right: Box<BoundExpr>,
    },
}

/// Evaluate `formula` against every row of `table` and return a new table
/// with `new_column` holding the computed numbers (appended, or overwritten
/// in place if the column already exists).
///
/// All-or-nothing: the first failing row aborts the whole operation and no
/// table is produced.
pub fn evaluate(formula: &str, table: &Table, new_column: &str) -> Result<Table, EngineError> {
    let parsed = parser::parse(formula).map_err(EngineError::InvalidFormula)?;
    let bound = bind(&parsed, table)?;

    let mut values = Vec::with_capacity(table.row_count());
    for (idx, row) in table.rows().iter().enumerate() {
        let n = eval_row(&bound, row, idx)?;
        values.push(Value::Number(n));
    }

    table.with_column(new_column, values)
}

/// Resolve identifiers: a column name wins; otherwise the identifier must
/// itself be a numeric literal.
fn bind(expr: &Expr, table: &Table) -> Result<BoundExpr, EngineError> {
    match expr {
        Expr::Number(n) => Ok(BoundExpr::Number(*n)),
        Expr::Ident(name) => {
            if table.has_column(name) {
                Ok(BoundExpr::ColumnRef(name.clone()))
            } else if let Ok(n) = name.parse::<f64>() {
                Ok(BoundExpr::Number(n))
            } else {
                Err(EngineError::UnknownReference(name.clone()))
            }
        }
        Expr::BinaryOp { op, left, right } => Ok(BoundExpr::BinaryOp {
            op: *op,
            left: Box::new(bind(left, table)?),
            right: Box::new(bind(right, table)?),
        }),
    }
}

fn eval_row(expr: &BoundExpr, row: &Row, row_idx: usize) -> Result<f64, EngineError> {
    match expr {
        BoundExpr::Number(n) => Ok(*n),
        BoundExpr::ColumnRef(name) => {
            let value = row.get(name).unwrap_or(&Value::Null);
            value.to_number().ok_or(EngineError::NonNumericOperand {
                column: name.clone(),
                row: row_idx,
            })
        }
        BoundExpr::BinaryOp { op, left, right } => {
            let lhs = eval_row(left, row, row_idx)?;
            let rhs = eval_row(right, row, row_idx)?;
            match op {
                Op::Add => Ok(lhs + rhs),
                Op::Sub => Ok(lhs - rhs),
                Op::Mul => Ok(lhs * rhs),
                Op::Div => {
                    if rhs == 0.0 {
                        Err(EngineError::DivisionByZero { row: row_idx })
                    } else {
                        Ok(lhs / rhs)
                    }
                }
            }
        }
    }
}
