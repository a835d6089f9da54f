//! Operation implementations. Each function takes the table(s) plus typed
//! arguments and returns derived data; the dispatcher owns binding and the
//! store, so nothing here mutates shared state.

pub mod aggregate;
pub mod dates;
pub mod filter;
pub mod join;
pub mod math;
pub mod reshape;
pub mod sentiment;

use sheetquery_core::{Column, Table};

use crate::error::EngineError;

/// What an operation hands back for normalization.
#[derive(Debug)]
pub enum OpOutput {
    Table(Table),
    Scalar(f64),
    Text(String),
}

/// Look up a column or fail with the schema error naming the operation.
pub(crate) fn require_column<'a>(
    op: &'static str,
    table: &'a Table,
    name: &str,
) -> Result<&'a Column, EngineError> {
    table.column(name).ok_or_else(|| EngineError::ColumnNotFound {
        op,
        column: name.to_string(),
    })
}

/// Numeric view of a column: `Some(n)` per number, `None` per null.
/// Any other type makes the whole operation an invalid-target failure.
pub(crate) fn numeric_values(
    op: &'static str,
    table: &Table,
    name: &str,
) -> Result<Vec<Option<f64>>, EngineError> {
    let column = require_column(op, table, name)?;
    let mut out = Vec::with_capacity(column.values.len());
    for v in &column.values {
        if v.is_null() {
            out.push(None);
        } else {
            match v.as_number() {
                Some(n) => out.push(Some(n)),
                None => {
                    return Err(EngineError::Compute(format!(
                        "{op}: column '{name}' is not numeric"
                    )))
                }
            }
        }
    }
    Ok(out)
}
