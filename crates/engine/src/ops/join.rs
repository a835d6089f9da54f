use rustc_hash::FxHashMap;
use sheetquery_core::{Column, Table, Value};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Some(Self::Inner),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "outer" => Some(Self::Outer),
            _ => None,
        }
    }
}

/// Join key for one row: canonical strings per key column, or None when any
/// key cell is null (null keys never match).
fn row_key(table: &Table, key_idx: &[usize], row: usize) -> Option<Vec<String>> {
    let mut key = Vec::with_capacity(key_idx.len());
    for &c in key_idx {
        let v = &table.columns()[c].values[row];
        if v.is_null() {
            return None;
        }
        key.push(v.key_string());
    }
    Some(key)
}

/// Join the primary (left) table with the secondary (right) table.
///
/// When `on` is unspecified the key set is the schema intersection, in left
/// column order; an empty intersection is a compute failure. Output columns:
/// keys, then left non-key columns, then right non-key columns (suffixed
/// `_right` on a name collision).
pub fn join_tables(
    left: &Table,
    right: &Table,
    join_type: JoinType,
    on: Option<&str>,
) -> Result<Table, EngineError> {
    let keys: Vec<String> = match on {
        Some(col) => {
            for (side, t) in [("primary", left), ("secondary", right)] {
                if !t.has_column(col) {
                    return Err(EngineError::ColumnNotFound {
                        op: "join_tables",
                        column: format!("{col} (in {side} table)"),
                    });
                }
            }
            vec![col.to_string()]
        }
        None => {
            let common: Vec<String> = left
                .column_names()
                .into_iter()
                .filter(|n| right.has_column(n))
                .map(|n| n.to_string())
                .collect();
            if common.is_empty() {
                return Err(EngineError::Compute(
                    "join_tables: no common columns found for joining".to_string(),
                ));
            }
            common
        }
    };

    let left_key_idx: Vec<usize> = keys.iter().map(|k| left.column_index(k).unwrap()).collect();
    let right_key_idx: Vec<usize> = keys.iter().map(|k| right.column_index(k).unwrap()).collect();

    let left_extra: Vec<usize> = (0..left.n_cols())
        .filter(|i| !left_key_idx.contains(i))
        .collect();
    let right_extra: Vec<usize> = (0..right.n_cols())
        .filter(|i| !right_key_idx.contains(i))
        .collect();

    // Output headers: keys, left extras, right extras (de-collided)
    let mut headers: Vec<String> = keys.clone();
    for &i in &left_extra {
        headers.push(left.columns()[i].name.clone());
    }
    for &i in &right_extra {
        let name = &right.columns()[i].name;
        if headers.iter().any(|h| h == name) {
            headers.push(format!("{name}_right"));
        } else {
            headers.push(name.clone());
        }
    }

    // Index the right side by key
    let mut right_index: FxHashMap<Vec<String>, Vec<usize>> = FxHashMap::default();
    for j in 0..right.n_rows() {
        if let Some(key) = row_key(right, &right_key_idx, j) {
            right_index.entry(key).or_default().push(j);
        }
    }

    let mut matched_right = vec![false; right.n_rows()];
    // (left row, right row) pairs; None = null-padded side
    let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();

    for i in 0..left.n_rows() {
        let matches = row_key(left, &left_key_idx, i)
            .and_then(|key| right_index.get(&key))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);

        if matches.is_empty() {
            if matches!(join_type, JoinType::Left | JoinType::Outer) {
                pairs.push((Some(i), None));
            }
        } else {
            for &j in matches {
                matched_right[j] = true;
                pairs.push((Some(i), Some(j)));
            }
        }
    }

    if matches!(join_type, JoinType::Right | JoinType::Outer) {
        for (j, matched) in matched_right.iter().enumerate() {
            if !matched {
                pairs.push((None, Some(j)));
            }
        }
    }

    let mut out = Table::with_headers(headers);
    for (li, rj) in pairs {
        let mut row: Vec<Value> = Vec::with_capacity(out.n_cols());
        // Key values come from whichever side is present
        for k in 0..keys.len() {
            let v = match (li, rj) {
                (Some(i), _) => left.columns()[left_key_idx[k]].values[i].clone(),
                (None, Some(j)) => right.columns()[right_key_idx[k]].values[j].clone(),
                (None, None) => Value::Null,
            };
            row.push(v);
        }
        for &c in &left_extra {
            row.push(match li {
                Some(i) => left.columns()[c].values[i].clone(),
                None => Value::Null,
            });
        }
        for &c in &right_extra {
            row.push(match rj {
                Some(j) => right.columns()[c].values[j].clone(),
                None => Value::Null,
            });
        }
        out.push_row(row).map_err(EngineError::Compute)?;
    }

    Ok(out)
}
