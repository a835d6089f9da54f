use sheetquery_core::{Column, Table, Value};

use super::numeric_values;
use crate::error::EngineError;

/// Basic math action applied across a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathAction {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl MathAction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "subtract" => Some(Self::Subtract),
            "multiply" => Some(Self::Multiply),
            "divide" => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
        }
    }
}

/// Whole-operation zero check for divisors. Per-row null propagation is
/// deliberately not offered for divide.
fn reject_zero_divisor(op: &'static str, column: &str, values: &[Option<f64>]) -> Result<(), EngineError> {
    if values.iter().any(|v| *v == Some(0.0)) {
        return Err(EngineError::Compute(format!(
            "{op}: division by zero (column '{column}' contains a zero)"
        )));
    }
    Ok(())
}

/// Apply `action` to a column against itself, adding `<column>_<action>`.
pub fn math_single(table: &Table, action: MathAction, column: &str) -> Result<Table, EngineError> {
    let values = numeric_values("math_single", table, column)?;

    if action == MathAction::Divide {
        reject_zero_divisor("math_single", column, &values)?;
    }

    let result: Vec<Value> = values
        .iter()
        .map(|v| match v {
            Some(n) => Value::Number(action.apply(*n, *n)),
            None => Value::Null,
        })
        .collect();

    let mut derived = table.clone();
    derived
        .add_column(Column::new(format!("{}_{}", column, action.as_str()), result))
        .map_err(EngineError::Compute)?;
    Ok(derived)
}

/// Elementwise math between two columns, adding `<a>_<action>_<b>`.
pub fn math_pair(
    table: &Table,
    action: MathAction,
    column_a: &str,
    column_b: &str,
) -> Result<Table, EngineError> {
    let a = numeric_values("math_pair", table, column_a)?;
    let b = numeric_values("math_pair", table, column_b)?;

    if action == MathAction::Divide {
        reject_zero_divisor("math_pair", column_b, &b)?;
    }

    let result: Vec<Value> = a
        .iter()
        .zip(&b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Value::Number(action.apply(*x, *y)),
            _ => Value::Null,
        })
        .collect();

    let mut derived = table.clone();
    derived
        .add_column(Column::new(
            format!("{}_{}_{}", column_a, action.as_str(), column_b),
            result,
        ))
        .map_err(EngineError::Compute)?;
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revenue_cost() -> Table {
        Table::from_columns(vec![
            Column::new(
                "Revenue",
                vec![Value::Number(100.0), Value::Number(250.0), Value::Number(80.0)],
            ),
            Column::new(
                "Cost",
                vec![Value::Number(40.0), Value::Number(100.0), Value::Number(90.0)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_math_single_add() {
        let t = revenue_cost();
        let out = math_single(&t, MathAction::Add, "Revenue").unwrap();
        let col = out.column("Revenue_add").unwrap();
        assert_eq!(col.values[0], Value::Number(200.0));
        assert_eq!(col.values[2], Value::Number(160.0));
        // Original table untouched
        assert_eq!(t.n_cols(), 2);
    }

    #[test]
    fn test_math_single_null_propagates() {
        let t = Table::from_columns(vec![Column::new(
            "x",
            vec![Value::Number(2.0), Value::Null],
        )])
        .unwrap();
        let out = math_single(&t, MathAction::Multiply, "x").unwrap();
        let col = out.column("x_multiply").unwrap();
        assert_eq!(col.values, vec![Value::Number(4.0), Value::Null]);
    }

    #[test]
    fn test_math_single_divide_rejects_zero() {
        let t = Table::from_columns(vec![Column::new(
            "x",
            vec![Value::Number(2.0), Value::Number(0.0)],
        )])
        .unwrap();
        let err = math_single(&t, MathAction::Divide, "x").unwrap_err();
        assert_eq!(err.kind(), "compute");
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn test_math_single_missing_column() {
        let t = revenue_cost();
        let err = math_single(&t, MathAction::Add, "Profit").unwrap_err();
        assert_eq!(err.kind(), "schema");
        assert!(err.to_string().contains("Profit"));
    }

    #[test]
    fn test_math_single_non_numeric() {
        let t = Table::from_columns(vec![Column::new("x", vec![Value::Text("a".into())])]).unwrap();
        let err = math_single(&t, MathAction::Add, "x").unwrap_err();
        assert_eq!(err.kind(), "compute");
    }

    #[test]
    fn test_math_pair_subtract_elementwise() {
        let t = revenue_cost();
        let out = math_pair(&t, MathAction::Subtract, "Revenue", "Cost").unwrap();
        let col = out.column("Revenue_subtract_Cost").unwrap();
        assert_eq!(
            col.values,
            vec![Value::Number(60.0), Value::Number(150.0), Value::Number(-10.0)]
        );
    }

    #[test]
    fn test_math_pair_divide_rejects_zero_divisor() {
        let t = Table::from_columns(vec![
            Column::new("a", vec![Value::Number(1.0), Value::Number(2.0)]),
            Column::new("b", vec![Value::Number(5.0), Value::Number(0.0)]),
        ])
        .unwrap();
        let err = math_pair(&t, MathAction::Divide, "a", "b").unwrap_err();
        assert_eq!(err.kind(), "compute");
        // Zero in the dividend is fine
        assert!(math_pair(&t, MathAction::Divide, "b", "a").is_ok());
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(MathAction::from_str("add"), Some(MathAction::Add));
        assert_eq!(MathAction::from_str("DIVIDE"), Some(MathAction::Divide));
        assert_eq!(MathAction::from_str("modulo"), None);
    }
}
