//! Normalization of operation results into one JSON shape: tables become
//! arrays of row objects, scalars become numbers, text stays text. This is
//! the only representation callers ever see.

use serde_json::{Map, Value as Json};
use sheetquery_core::Table;

use crate::ops::OpOutput;

pub fn normalize(output: &OpOutput) -> Json {
    match output {
        OpOutput::Table(t) => table_to_json(t),
        OpOutput::Scalar(n) => sheetquery_core::Value::Number(*n).to_json(),
        OpOutput::Text(s) => Json::String(s.clone()),
    }
}

fn table_to_json(table: &Table) -> Json {
    let mut rows = Vec::with_capacity(table.n_rows());
    for i in 0..table.n_rows() {
        let mut obj = Map::with_capacity(table.n_cols());
        for column in table.columns() {
            obj.insert(column.name.clone(), column.values[i].to_json());
        }
        rows.push(Json::Object(obj));
    }
    Json::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetquery_core::{Column, Value};

    #[test]
    fn test_table_rows_carry_every_column_key() {
        let t = Table::from_columns(vec![
            Column::new("A", vec![Value::Number(1.0), Value::Null]),
            Column::new("B", vec![Value::Text("x".into()), Value::Text("y".into())]),
        ])
        .unwrap();
        let json = normalize(&OpOutput::Table(t));

        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            let obj = row.as_object().unwrap();
            assert_eq!(obj.len(), 2);
            assert!(obj.contains_key("A"));
            assert!(obj.contains_key("B"));
        }
        // Null cells are JSON null, not absent
        assert!(rows[1]["A"].is_null());
        assert_eq!(rows[0]["B"], Json::String("x".into()));
    }

    #[test]
    fn test_integral_floats_serialize_as_integers() {
        let json = normalize(&OpOutput::Scalar(1500.0));
        assert_eq!(json, Json::from(1500i64));

        let json = normalize(&OpOutput::Scalar(1500.5));
        assert_eq!(json.as_f64(), Some(1500.5));
    }

    #[test]
    fn test_nan_scalar_becomes_null() {
        assert!(normalize(&OpOutput::Scalar(f64::NAN)).is_null());
    }

    #[test]
    fn test_empty_table_is_empty_array() {
        let t = Table::with_headers(vec!["A".into()]);
        assert_eq!(normalize(&OpOutput::Table(t)), Json::Array(vec![]));
    }

    #[test]
    fn test_serialization_is_stable() {
        let t = Table::from_columns(vec![
            Column::new("n", vec![Value::Number(2.5)]),
            Column::new("s", vec![Value::Text("ok".into())]),
        ])
        .unwrap();
        let out = OpOutput::Table(t);
        let a = serde_json::to_string(&normalize(&out)).unwrap();
        let b = serde_json::to_string(&normalize(&out)).unwrap();
        assert_eq!(a, b);
    }
}
