use std::fmt;

/// Failure to load a file into a table.
#[derive(Debug)]
pub enum ImportError {
    /// Could not open or read the file.
    Io(String),
    /// The file opened but its contents could not be parsed.
    Parse(String),
    /// A sheet was requested by name and the workbook has no such sheet.
    SheetNotFound { name: String, available: Vec<String> },
    /// The file or sheet holds no data rows at all.
    Empty,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(e) => write!(f, "could not read file: {e}"),
            ImportError::Parse(e) => write!(f, "could not parse file: {e}"),
            ImportError::SheetNotFound { name, available } => write!(
                f,
                "sheet '{name}' not found (workbook has: {})",
                available.join(", ")
            ),
            ImportError::Empty => write!(f, "file contains no data"),
        }
    }
}

impl std::error::Error for ImportError {}
