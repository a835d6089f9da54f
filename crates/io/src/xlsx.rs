// Excel file import (xlsx, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::NaiveDate;
use sheetquery_core::{parse_date, Table, Value};

use crate::error::ImportError;
use crate::{build_table, normalize_headers};

/// Serial 0 in the 1900 date system (accounting for the Lotus leap-year bug).
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// List the sheet names of a workbook without loading any data.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, ImportError> {
    let workbook = open_workbook_auto(path).map_err(|e| ImportError::Io(e.to_string()))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Import one sheet as a table. With `sheet: None` the first sheet is used.
/// The first row is the header row.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, ImportError> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| ImportError::Io(e.to_string()))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(ImportError::Empty);
    }

    let target = match sheet {
        Some(name) => {
            if !names.iter().any(|n| n == name) {
                return Err(ImportError::SheetNotFound {
                    name: name.to_string(),
                    available: names,
                });
            }
            name.to_string()
        }
        None => names[0].clone(),
    };

    let range = workbook
        .worksheet_range(&target)
        .map_err(|e| ImportError::Parse(format!("failed to read sheet '{target}': {e}")))?;

    let mut rows = range.rows();
    let header_cells = rows.next().ok_or(ImportError::Empty)?;
    let headers = normalize_headers(header_cells.iter().map(header_text).collect());

    let data: Vec<Vec<Value>> = rows
        .map(|r| r.iter().map(cell_to_value).collect())
        .collect();
    if data.is_empty() {
        return Err(ImportError::Empty);
    }

    build_table(headers, data)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::from_input(s),
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        // Formula errors become nulls rather than poisoning numeric columns
        Data::Error(_) => Value::Null,
        Data::DateTime(dt) => {
            // 1900 date system serial; the time-of-day fraction is dropped
            let serial = dt.as_f64();
            let days = serial.floor() as i64;
            match excel_epoch().checked_add_signed(chrono::Duration::days(days)) {
                Some(d) => Value::Date(d),
                None => Value::Number(serial),
            }
        }
        Data::DateTimeIso(s) => match parse_date(s) {
            Some(d) => Value::Date(d),
            None => Value::Text(s.clone()),
        },
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}
