// File I/O operations

pub mod csv;
pub mod error;
pub mod xlsx;

use sheetquery_core::Table;

pub use error::ImportError;

/// Normalize a header row: blank names become `column_<n>` (1-based) and
/// duplicates get a numeric suffix, so every column name is non-empty and
/// unique.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", i + 1)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while out.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        out.push(candidate);
    }
    out
}

/// Header + data rows into a table, padding short rows with nulls.
pub(crate) fn build_table(
    headers: Vec<String>,
    rows: Vec<Vec<sheetquery_core::Value>>,
) -> Result<Table, ImportError> {
    let mut table = Table::with_headers(headers);
    let width = table.n_cols();
    for mut row in rows {
        row.resize(width, sheetquery_core::Value::Null);
        row.truncate(width);
        table.push_row(row).map_err(ImportError::Parse)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_headers_blanks_and_duplicates() {
        let headers = normalize_headers(vec![
            "Name".into(),
            "".into(),
            "Name".into(),
            "  ".into(),
            "Name".into(),
        ]);
        assert_eq!(headers, vec!["Name", "column_2", "Name_2", "column_4", "Name_3"]);
    }

    #[test]
    fn test_build_table_pads_short_rows() {
        use sheetquery_core::Value;
        let t = build_table(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Number(1.0)], vec![Value::Number(2.0), Value::Number(3.0)]],
        )
        .unwrap();
        assert_eq!(t.column("b").unwrap().values[0], Value::Null);
        assert_eq!(t.column("b").unwrap().values[1], Value::Number(3.0));
    }
}
