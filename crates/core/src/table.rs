use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A named, ordered sequence of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// True if every non-null value is a number and at least one number exists.
    pub fn is_numeric(&self) -> bool {
        let mut saw_number = false;
        for v in &self.values {
            match v {
                Value::Number(_) => saw_number = true,
                Value::Null => {}
                _ => return false,
            }
        }
        saw_number
    }
}

/// An in-memory table: ordered named columns of equal length.
///
/// Tables are value types. Operations that derive data clone and extend;
/// a stored table is never mutated through this API after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pre-made columns, enforcing the equal-length invariant.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, String> {
        if let Some(first) = columns.first() {
            let len = first.values.len();
            for col in &columns {
                if col.values.len() != len {
                    return Err(format!(
                        "column '{}' has {} rows, expected {}",
                        col.name,
                        col.values.len(),
                        len
                    ));
                }
            }
        }
        Ok(Self { columns })
    }

    /// Build an empty table with the given headers, to be filled row by row.
    pub fn with_headers(headers: Vec<String>) -> Self {
        Self {
            columns: headers.into_iter().map(|h| Column::new(h, Vec::new())).collect(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "row has {} values, table has {} columns",
                row.len(),
                self.columns.len()
            ));
        }
        for (col, value) in self.columns.iter_mut().zip(row) {
            col.values.push(value);
        }
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Append a derived column. Errors on length mismatch or duplicate name.
    pub fn add_column(&mut self, column: Column) -> Result<(), String> {
        if !self.columns.is_empty() && column.values.len() != self.n_rows() {
            return Err(format!(
                "column '{}' has {} rows, table has {}",
                column.name,
                column.values.len(),
                self.n_rows()
            ));
        }
        if self.has_column(&column.name) {
            return Err(format!("column '{}' already exists", column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// One row as a vector of value references, in column order.
    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.n_rows()).map(move |i| self.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new(
                "Salary",
                vec![
                    Value::Number(1000.0),
                    Value::Number(2000.0),
                    Value::Number(3000.0),
                ],
            ),
            Column::new(
                "Department",
                vec![
                    Value::Text("IT".into()),
                    Value::Text("IT".into()),
                    Value::Text("HR".into()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let err = Table::from_columns(vec![
            Column::new("a", vec![Value::Number(1.0)]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(err.contains("'b'"));
    }

    #[test]
    fn test_push_row_and_dimensions() {
        let mut t = Table::with_headers(vec!["a".into(), "b".into()]);
        t.push_row(vec![Value::Number(1.0), Value::Text("x".into())]).unwrap();
        assert_eq!(t.n_rows(), 1);
        assert_eq!(t.n_cols(), 2);
        assert!(t.push_row(vec![Value::Null]).is_err());
    }

    #[test]
    fn test_column_lookup() {
        let t = sample();
        assert!(t.has_column("Salary"));
        assert!(!t.has_column("salary"));
        assert_eq!(t.column_index("Department"), Some(1));
        assert_eq!(t.column("Missing").map(|c| c.name.as_str()), None);
    }

    #[test]
    fn test_add_column_invariants() {
        let mut t = sample();
        assert!(t
            .add_column(Column::new("Bonus", vec![Value::Null; 3]))
            .is_ok());
        assert!(t.add_column(Column::new("Bonus", vec![Value::Null; 3])).is_err());
        assert!(t.add_column(Column::new("Short", vec![Value::Null])).is_err());
    }

    #[test]
    fn test_is_numeric() {
        let t = sample();
        assert!(t.column("Salary").unwrap().is_numeric());
        assert!(!t.column("Department").unwrap().is_numeric());
        let nulls = Column::new("n", vec![Value::Null, Value::Null]);
        assert!(!nulls.is_numeric());
        let mixed = Column::new("m", vec![Value::Number(1.0), Value::Null]);
        assert!(mixed.is_numeric());
    }

    #[test]
    fn test_rows_iteration_order() {
        let t = sample();
        let rows: Vec<Vec<&Value>> = t.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], &Value::Number(1000.0));
        assert_eq!(rows[2][1], &Value::Text("HR".into()));
    }
}
