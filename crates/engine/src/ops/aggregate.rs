use sheetquery_core::{Column, Table, Value};

use super::{numeric_values, require_column};
use crate::error::EngineError;

/// Summary report: one row per numeric column with sum/average/min/max.
pub fn summary_report(table: &Table) -> Result<Table, EngineError> {
    let mut out = Table::with_headers(vec![
        "column".into(),
        "sum".into(),
        "average".into(),
        "min".into(),
        "max".into(),
    ]);

    for column in table.columns() {
        if !column.is_numeric() {
            continue;
        }
        let nums: Vec<f64> = column.values.iter().filter_map(|v| v.as_number()).collect();
        let sum: f64 = nums.iter().sum();
        let count = nums.len() as f64;
        let min = nums.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = nums.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        out.push_row(vec![
            Value::Text(column.name.clone()),
            Value::Number(sum),
            Value::Number(sum / count),
            Value::Number(min),
            Value::Number(max),
        ])
        .map_err(EngineError::Compute)?;
    }

    Ok(out)
}

/// Row indexes where any cell matches `value`. The call form carries only
/// the matched value, not which column holds it.
fn rows_matching(table: &Table, value: &Value) -> Vec<usize> {
    (0..table.n_rows())
        .filter(|&i| table.columns().iter().any(|c| c.values[i].matches(value)))
        .collect()
}

fn filtered_numbers(
    op: &'static str,
    table: &Table,
    column: &str,
    value: &Value,
) -> Result<Vec<f64>, EngineError> {
    let nums = numeric_values(op, table, column)?;
    Ok(rows_matching(table, value)
        .into_iter()
        .filter_map(|i| nums[i])
        .collect())
}

/// Sum of `column` over matching rows. No matches sums to zero.
pub fn sum_with_filter(table: &Table, column: &str, value: &Value) -> Result<f64, EngineError> {
    let nums = filtered_numbers("sum_with_filter", table, column, value)?;
    Ok(nums.iter().sum())
}

/// Average of `column` over matching rows. No matching numeric rows is a
/// compute failure rather than a NaN result.
pub fn avg_with_filter(table: &Table, column: &str, value: &Value) -> Result<f64, EngineError> {
    let nums = filtered_numbers("avg_with_filter", table, column, value)?;
    if nums.is_empty() {
        return Err(EngineError::Compute(format!(
            "avg_with_filter: no rows match '{value}' with a numeric '{column}'"
        )));
    }
    Ok(nums.iter().sum::<f64>() / nums.len() as f64)
}

/// Average of `column` over every row.
pub fn overall_average(table: &Table, column: &str) -> Result<f64, EngineError> {
    require_column("overall_average", table, column)?;
    let nums: Vec<f64> = numeric_values("overall_average", table, column)?
        .into_iter()
        .flatten()
        .collect();
    if nums.is_empty() {
        return Err(EngineError::Compute(format!(
            "overall_average: column '{column}' has no numeric values"
        )));
    }
    Ok(nums.iter().sum::<f64>() / nums.len() as f64)
}
