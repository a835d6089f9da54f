use rustc_hash::FxHashMap;
use sheetquery_core::{Column, Table, Value};

use super::{numeric_values, require_column};
use crate::error::EngineError;

/// Aggregation applied to the values column of a pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunc {
    Sum,
    Average,
    Min,
    Max,
    Count,
}

impl AggFunc {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Some(Self::Sum),
            "average" | "mean" | "avg" => Some(Self::Average),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "count" => Some(Self::Count),
            _ => None,
        }
    }

    fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(match self {
            Self::Sum => values.iter().sum(),
            Self::Average => values.iter().sum::<f64>() / values.len() as f64,
            Self::Min => values.iter().cloned().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            Self::Count => values.len() as f64,
        })
    }
}

/// Pivot: one output row per distinct `index` value, one output column per
/// distinct `columns` value, cells aggregating `values`. First-appearance
/// order is preserved for both axes; empty groups are null.
pub fn pivot(
    table: &Table,
    index: &str,
    columns: &str,
    values: &str,
    aggfunc: AggFunc,
) -> Result<Table, EngineError> {
    let index_col = require_column("pivot_table", table, index)?;
    let columns_col = require_column("pivot_table", table, columns)?;
    require_column("pivot_table", table, values)?;

    // For count any value type goes; otherwise the target must be numeric
    let value_nums: Vec<Option<f64>> = if aggfunc == AggFunc::Count {
        table
            .column(values)
            .unwrap()
            .values
            .iter()
            .map(|v| if v.is_null() { None } else { Some(1.0) })
            .collect()
    } else {
        numeric_values("pivot_table", table, values)?
    };

    let mut row_labels: Vec<Value> = Vec::new();
    let mut col_labels: Vec<String> = Vec::new();
    let mut groups: FxHashMap<(String, String), Vec<f64>> = FxHashMap::default();

    for i in 0..table.n_rows() {
        let row_label = &index_col.values[i];
        let col_label = columns_col.values[i].key_string();

        let row_key = row_label.key_string();
        if !row_labels.iter().any(|l| l.key_string() == row_key) {
            row_labels.push(row_label.clone());
        }
        if !col_labels.contains(&col_label) {
            col_labels.push(col_label.clone());
        }
        if let Some(n) = value_nums[i] {
            groups.entry((row_key, col_label)).or_default().push(n);
        }
    }

    let mut headers = vec![index.to_string()];
    headers.extend(col_labels.iter().cloned());
    let mut out = Table::with_headers(headers);

    for row_label in &row_labels {
        let row_key = row_label.key_string();
        let mut row = vec![row_label.clone()];
        for col_label in &col_labels {
            let cell = groups
                .get(&(row_key.clone(), col_label.clone()))
                .and_then(|vs| aggfunc.apply(vs))
                .map(Value::Number)
                .unwrap_or(Value::Null);
            row.push(cell);
        }
        out.push_row(row).map_err(EngineError::Compute)?;
    }

    Ok(out)
}

/// Unpivot (melt): the given value columns become `variable`/`value` rows,
/// every other column is carried as an identifier.
pub fn unpivot(table: &Table, value_columns: &[String]) -> Result<Table, EngineError> {
    for col in value_columns {
        require_column("unpivot_table", table, col)?;
    }

    let id_cols: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| !value_columns.contains(&c.name))
        .collect();

    let mut headers: Vec<String> = id_cols.iter().map(|c| c.name.clone()).collect();
    headers.push("variable".to_string());
    headers.push("value".to_string());
    let mut out = Table::with_headers(headers);

    for i in 0..table.n_rows() {
        for vcol in value_columns {
            let mut row: Vec<Value> = id_cols.iter().map(|c| c.values[i].clone()).collect();
            row.push(Value::Text(vcol.clone()));
            row.push(table.column(vcol).unwrap().values[i].clone());
            out.push_row(row).map_err(EngineError::Compute)?;
        }
    }

    Ok(out)
}
