use sheetquery_core::{Column, Table, Value};

use super::require_column;
use crate::error::EngineError;

/// Rows where `column` equals `value`. With `drop_nulls`, rows containing
/// any null are removed from the result as well.
pub fn filter_rows(
    table: &Table,
    column: &str,
    value: &Value,
    drop_nulls: bool,
) -> Result<Table, EngineError> {
    let target = require_column("filter_rows", table, column)?;

    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&i| {
            if !target.values[i].matches(value) {
                return false;
            }
            if drop_nulls && table.columns().iter().any(|c| c.values[i].is_null()) {
                return false;
            }
            true
        })
        .collect();

    let columns = table
        .columns()
        .iter()
        .map(|c| {
            Column::new(
                c.name.clone(),
                keep.iter().map(|&i| c.values[i].clone()).collect(),
            )
        })
        .collect();

    Table::from_columns(columns).map_err(EngineError::Compute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new(
                "Department",
                vec![
                    Value::Text("IT".into()),
                    Value::Text("IT".into()),
                    Value::Text("HR".into()),
                ],
            ),
            Column::new(
                "Bonus",
                vec![Value::Number(100.0), Value::Null, Value::Number(50.0)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_filter_keeps_matching_rows() {
        let out = filter_rows(&sample(), "Department", &Value::Text("HR".into()), true).unwrap();
        assert_eq!(out.n_rows(), 1);
        assert_eq!(out.column("Bonus").unwrap().values[0], Value::Number(50.0));
    }

    #[test]
    fn test_drop_nulls_default_behavior() {
        let value = Value::Text("IT".into());
        let strict = filter_rows(&sample(), "Department", &value, true).unwrap();
        assert_eq!(strict.n_rows(), 1, "row with null Bonus dropped");

        let loose = filter_rows(&sample(), "Department", &value, false).unwrap();
        assert_eq!(loose.n_rows(), 2);
        assert_eq!(loose.column("Bonus").unwrap().values[1], Value::Null);
    }

    #[test]
    fn test_filter_preserves_schema() {
        let out = filter_rows(&sample(), "Department", &Value::Text("Legal".into()), true).unwrap();
        assert_eq!(out.n_rows(), 0);
        assert_eq!(out.column_names(), vec!["Department", "Bonus"]);
    }

    #[test]
    fn test_filter_missing_column() {
        let err = filter_rows(&sample(), "Team", &Value::Text("IT".into()), true).unwrap_err();
        assert_eq!(err.kind(), "schema");
        assert!(err.to_string().contains("Team"));
    }

    #[test]
    fn test_filter_numeric_value() {
        let out = filter_rows(&sample(), "Bonus", &Value::Number(100.0), false).unwrap();
        assert_eq!(out.n_rows(), 1);
    }
}
