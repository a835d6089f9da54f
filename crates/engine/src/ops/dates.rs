use chrono::Datelike;
use sheetquery_core::{Column, Table, Value};

use super::require_column;
use crate::error::EngineError;

/// Add year/month/day columns extracted from a date column. Cells that do
/// not parse as dates yield null parts for that row, never an error.
pub fn date_parts(table: &Table, date_column: &str) -> Result<Table, EngineError> {
    let column = require_column("date_parts", table, date_column)?;

    let mut years = Vec::with_capacity(column.values.len());
    let mut months = Vec::with_capacity(column.values.len());
    let mut days = Vec::with_capacity(column.values.len());

    for v in &column.values {
        match v.as_date() {
            Some(d) => {
                years.push(Value::Number(d.year() as f64));
                months.push(Value::Number(d.month() as f64));
                days.push(Value::Number(d.day() as f64));
            }
            None => {
                years.push(Value::Null);
                months.push(Value::Null);
                days.push(Value::Null);
            }
        }
    }

    let mut derived = table.clone();
    for col in [
        Column::new("year", years),
        Column::new("month", months),
        Column::new("day", days),
    ] {
        derived.add_column(col).map_err(EngineError::Compute)?;
    }
    Ok(derived)
}

/// Add a day-count column `result_column` = end - start. Rows where either
/// side is unparsable get null.
pub fn date_diff(
    table: &Table,
    start_column: &str,
    end_column: &str,
    result_column: &str,
) -> Result<Table, EngineError> {
    let start = require_column("date_diff", table, start_column)?;
    let end = require_column("date_diff", table, end_column)?;

    let diffs: Vec<Value> = start
        .values
        .iter()
        .zip(&end.values)
        .map(|(s, e)| match (s.as_date(), e.as_date()) {
            (Some(s), Some(e)) => Value::Number((e - s).num_days() as f64),
            _ => Value::Null,
        })
        .collect();

    let mut derived = table.clone();
    derived
        .add_column(Column::new(result_column, diffs))
        .map_err(EngineError::Compute)?;
    Ok(derived)
}
