// CSV/TSV import

use std::io::Read;
use std::path::Path;

use sheetquery_core::{Table, Value};

use crate::error::ImportError;
use crate::{build_table, normalize_headers};

/// Import a delimited text file, sniffing the delimiter. The first record is
/// the header row; cell types are inferred per cell.
pub fn import(path: &Path) -> Result<Table, ImportError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<Table, ImportError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        // Higher field count breaks ties — more columns = more likely real delimiter
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, ImportError> {
    let mut file = std::fs::File::open(path).map_err(|e| ImportError::Io(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ImportError::Io(e.to_string()))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Table, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ImportError::Parse(e.to_string()))?;
        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    if records.is_empty() {
        return Err(ImportError::Empty);
    }

    let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut header = records.remove(0);
    header.resize(width, String::new());
    let headers = normalize_headers(header);

    if records.is_empty() {
        return Err(ImportError::Empty);
    }

    let rows: Vec<Vec<Value>> = records
        .into_iter()
        .map(|r| r.iter().map(|s| Value::from_input(s)).collect())
        .collect();

    build_table(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Name;Age;City\nAlice;30;Paris\nBob;25;London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Name,Age,City\nAlice,30,Paris\nBob,25,London\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Name\tAge\tCity\nAlice\t30\tParis\nBob\t25\tLondon\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        // Semicolon delimiter but commas appear inside quoted fields
        let content = "Name;Address;City\n\"Doe, Jane\";\"123 Main St, Apt 4\";Paris\nBob;\"456 Elm\";London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_infers_cell_types() {
        use sheetquery_core::Value;
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.csv");
        fs::write(
            &path,
            "Name,Salary,HireDate\nAlice,1000,2024-03-15\nBob,,not-a-date\n",
        )
        .unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.column_names(), vec!["Name", "Salary", "HireDate"]);
        assert_eq!(table.column("Salary").unwrap().values[0], Value::Number(1000.0));
        assert_eq!(table.column("Salary").unwrap().values[1], Value::Null);
        assert_eq!(
            table.column("HireDate").unwrap().values[0],
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            table.column("HireDate").unwrap().values[1],
            Value::Text("not-a-date".into())
        );
    }

    #[test]
    fn test_import_semicolon_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.csv");
        fs::write(&path, "Name;Age;City\nAlice;30;Paris\nBob;25;London\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column_names(), vec!["Name", "Age", "City"]);
    }

    #[test]
    fn test_import_ragged_rows_are_padded() {
        use sheetquery_core::Value;
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b\n1\n2,3,4\n").unwrap();

        let table = import(&path).unwrap();
        // Widest record wins; the extra column gets a synthesized name
        assert_eq!(table.column_names(), vec!["a", "b", "column_3"]);
        assert_eq!(table.column("b").unwrap().values[0], Value::Null);
        assert_eq!(table.column("column_3").unwrap().values[1], Value::Number(4.0));
    }

    #[test]
    fn test_import_empty_and_header_only_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        fs::write(&path, "").unwrap();
        assert!(matches!(import(&path), Err(ImportError::Empty)));

        fs::write(&path, "a,b,c\n").unwrap();
        assert!(matches!(import(&path), Err(ImportError::Empty)));
    }

    #[test]
    fn test_import_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "café" with 0xE9 (Windows-1252 é), invalid as UTF-8
        fs::write(&path, b"Name,City\nRen\xe9,Nice\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(
            table.column("Name").unwrap().values[0],
            sheetquery_core::Value::Text("René".into())
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = import(Path::new("/nonexistent/file.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
