// sheetquery CLI - natural-language queries over spreadsheet files

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sheetquery_config::{AIConfigStatus, AIDiagnostics, ResolvedAIConfig, Settings};
use sheetquery_core::Table;
use sheetquery_engine::dispatch::dispatch_on;
use sheetquery_engine::{normalize, resolve_intent, EngineError, Slot, TableStore};
use sheetquery_io::ImportError;
use sheetquery_llm::ChatClient;

use exit_codes::{
    engine_exit_code, EXIT_AI_DISABLED, EXIT_AI_MISSING_KEY, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE,
};

/// Sheet name that holds free-form text for sentiment queries, when present.
const UNSTRUCTURED_SHEET: &str = "Unstructured_Data";

#[derive(Parser)]
#[command(name = "shq")]
#[command(about = "Query spreadsheet files in plain language")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about a file; the model picks the operation
    #[command(after_help = "\
Examples:
  shq query sales.xlsx \"what is the average salary in IT?\"
  shq query data.csv \"pivot amount by region and quarter\"
  shq query book.xlsx \"join with the locations table\" --second locations.csv
  shq query feedback.xlsx \"what is the overall sentiment?\" --unstructured")]
    Query {
        /// Input file (.csv, .tsv, .xlsx, .xls, .xlsb, .ods)
        file: PathBuf,

        /// The question, in plain language
        question: String,

        /// Sheet name for multi-sheet files (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Second file, loaded as the secondary table for joins
        #[arg(long)]
        second: Option<PathBuf>,

        /// Sheet name within the second file
        #[arg(long)]
        second_sheet: Option<String>,

        /// Run against the unstructured-text sheet instead of the primary table
        #[arg(long)]
        unstructured: bool,

        /// Print the resolved operation call to stderr before executing
        #[arg(long)]
        show_call: bool,
    },

    /// Execute one operation call directly, no model required
    #[command(after_help = "\
Examples:
  shq run sales.csv 'overall_average(Salary)'
  shq run sales.csv 'filter_rows(Department, \"IT\")'
  shq run book.xlsx 'join_tables(left, id)' --second other.csv")]
    Run {
        /// Input file
        file: PathBuf,

        /// Operation call, e.g. 'sum_with_filter(Salary, \"IT\")'
        expr: String,

        /// Sheet name for multi-sheet files
        #[arg(long)]
        sheet: Option<String>,

        /// Second file, loaded as the secondary table for joins
        #[arg(long)]
        second: Option<PathBuf>,

        /// Sheet name within the second file
        #[arg(long)]
        second_sheet: Option<String>,

        /// Run against the unstructured-text sheet instead of the primary table
        #[arg(long)]
        unstructured: bool,
    },

    /// Sum, average, min and max for every numeric column
    Summary {
        /// Input file
        file: PathBuf,

        /// Sheet name for multi-sheet files
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Print the column names of a file as JSON
    Columns {
        /// Input file
        file: PathBuf,

        /// Sheet name for multi-sheet files
        #[arg(long)]
        sheet: Option<String>,
    },

    /// List the sheet names of a workbook
    Sheets {
        /// Input workbook (.xlsx, .xls, .xlsb, .ods)
        file: PathBuf,
    },

    /// AI configuration and diagnostics
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Check AI configuration
    Doctor {
        /// Output as JSON for machine parsing
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: shq <command> [options]");
            eprintln!("       shq --help for more information");
            Ok(())
        }
        Some(Commands::Query {
            file,
            question,
            sheet,
            second,
            second_sheet,
            unstructured,
            show_call,
        }) => cmd_query(
            &file,
            &question,
            sheet.as_deref(),
            second.as_deref(),
            second_sheet.as_deref(),
            unstructured,
            show_call,
        ),
        Some(Commands::Run {
            file,
            expr,
            sheet,
            second,
            second_sheet,
            unstructured,
        }) => cmd_run(
            &file,
            &expr,
            sheet.as_deref(),
            second.as_deref(),
            second_sheet.as_deref(),
            unstructured,
        ),
        Some(Commands::Summary { file, sheet }) => {
            cmd_run(&file, "summary()", sheet.as_deref(), None, None, false)
        }
        Some(Commands::Columns { file, sheet }) => cmd_columns(&file, sheet.as_deref()),
        Some(Commands::Sheets { file }) => cmd_sheets(&file),
        Some(Commands::Ai { command }) => match command {
            AiCommands::Doctor { json } => cmd_ai_doctor(json),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with its registry exit code.
    pub fn engine(err: EngineError) -> Self {
        let hint = match &err {
            EngineError::UnknownOperation(_) => {
                Some("run `shq run --help` for the operation catalog".to_string())
            }
            EngineError::MissingTable { slot } if *slot == "secondary" => {
                Some("pass a second file with --second".to_string())
            }
            _ => None,
        };
        Self { code: engine_exit_code(&err), message: err.to_string(), hint }
    }

    /// Create error from an import failure.
    pub fn import(err: ImportError) -> Self {
        let code = match &err {
            ImportError::Io(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    /// AI configuration failure with one of the dedicated exit codes.
    pub fn ai(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// File loading
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Workbook,
    Delimited,
}

fn file_kind(path: &Path) -> FileKind {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("xlsx") | Some("xls") | Some("xlsb") | Some("ods") => FileKind::Workbook,
        _ => FileKind::Delimited,
    }
}

fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, CliError> {
    let table = match file_kind(path) {
        FileKind::Workbook => sheetquery_io::xlsx::import(path, sheet).map_err(CliError::import)?,
        FileKind::Delimited => {
            if sheet.is_some() {
                return Err(CliError::args("--sheet only applies to workbook files"));
            }
            sheetquery_io::csv::import(path).map_err(CliError::import)?
        }
    };
    Ok(table)
}

/// Load the primary table (and, for workbooks, the unstructured-text sheet
/// when one exists), plus an optional secondary file for joins.
fn load_store(
    file: &Path,
    sheet: Option<&str>,
    second: Option<&Path>,
    second_sheet: Option<&str>,
) -> Result<TableStore, CliError> {
    let store = TableStore::new();
    store.replace(Slot::Primary, load_table(file, sheet)?);

    if file_kind(file) == FileKind::Workbook {
        let names = sheetquery_io::xlsx::sheet_names(file).map_err(CliError::import)?;
        if names.iter().any(|n| n == UNSTRUCTURED_SHEET) {
            match sheetquery_io::xlsx::import(file, Some(UNSTRUCTURED_SHEET)) {
                Ok(table) => store.replace(Slot::Unstructured, table),
                // An empty text sheet is not worth failing the whole load
                Err(ImportError::Empty) => {}
                Err(e) => return Err(CliError::import(e)),
            }
        }
    }

    if let Some(second) = second {
        store.replace(Slot::Secondary, load_table(second, second_sheet)?);
    }

    Ok(store)
}

// ============================================================================
// Model plumbing
// ============================================================================

/// Build a chat client, or fail with the right AI exit code.
fn required_model() -> Result<ChatClient, CliError> {
    let config = ResolvedAIConfig::load();
    match config.status {
        AIConfigStatus::Ready => ChatClient::from_config(&config)
            .map_err(|e| CliError::ai(EXIT_AI_DISABLED, e.to_string())),
        AIConfigStatus::Disabled => Err(CliError::ai(
            EXIT_AI_DISABLED,
            "AI is disabled (provider=none)",
        )
        .with_hint(format!(
            "set ai.provider in {}",
            Settings::config_path().display()
        ))),
        AIConfigStatus::MissingKey => Err(CliError::ai(
            EXIT_AI_MISSING_KEY,
            config
                .blocking_reason
                .unwrap_or_else(|| "API key missing".to_string()),
        )
        .with_hint("run `shq ai doctor` for details")),
    }
}

/// Best-effort model for `run`: sentiment calls need it, everything else
/// works without one.
fn optional_model() -> Option<ChatClient> {
    let config = ResolvedAIConfig::load();
    if config.status.is_ready() {
        ChatClient::from_config(&config).ok()
    } else {
        None
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_result(json: &serde_json::Value, settings: &Settings) -> Result<(), CliError> {
    let limited;
    let out = match (settings.max_output_rows, json.as_array()) {
        (Some(max), Some(rows)) if rows.len() > max => {
            eprintln!("note: showing {} of {} rows", max, rows.len());
            limited = serde_json::Value::Array(rows[..max].to_vec());
            &limited
        }
        _ => json,
    };

    let text = if settings.pretty_output {
        serde_json::to_string_pretty(out)
    } else {
        serde_json::to_string(out)
    }
    .map_err(|e| CliError::error(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn execute(
    store: &TableStore,
    slot: Slot,
    expr: &str,
    model: Option<&ChatClient>,
    settings: &Settings,
) -> Result<(), CliError> {
    let model_ref = model.map(|m| m as &dyn sheetquery_engine::TextModel);
    let output = dispatch_on(store, slot, expr, model_ref).map_err(CliError::engine)?;
    print_result(&normalize(&output), settings)
}

fn cmd_query(
    file: &Path,
    question: &str,
    sheet: Option<&str>,
    second: Option<&Path>,
    second_sheet: Option<&str>,
    unstructured: bool,
    show_call: bool,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let store = load_store(file, sheet, second, second_sheet)?;
    let model = required_model()?;

    let slot = if unstructured { Slot::Unstructured } else { Slot::Primary };
    let table = store
        .get(slot)
        .ok_or_else(|| CliError::engine(EngineError::MissingTable { slot: slot.as_str() }))?;
    let columns: Vec<String> = table.column_names().iter().map(|n| n.to_string()).collect();

    let call = resolve_intent(&columns, question, &model).map_err(CliError::engine)?;
    if show_call {
        eprintln!("call: {}", call);
    }

    execute(&store, slot, &call, Some(&model), &settings)
}

fn cmd_run(
    file: &Path,
    expr: &str,
    sheet: Option<&str>,
    second: Option<&Path>,
    second_sheet: Option<&str>,
    unstructured: bool,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let store = load_store(file, sheet, second, second_sheet)?;
    let slot = if unstructured { Slot::Unstructured } else { Slot::Primary };
    let model = optional_model();
    execute(&store, slot, expr, model.as_ref(), &settings)
}

fn cmd_columns(file: &Path, sheet: Option<&str>) -> Result<(), CliError> {
    let settings = Settings::load();
    let table = load_table(file, sheet)?;
    let names: Vec<&str> = table.column_names();
    print_result(&serde_json::json!(names), &settings)
}

fn cmd_sheets(file: &Path) -> Result<(), CliError> {
    if file_kind(file) != FileKind::Workbook {
        return Err(CliError::args("sheets only applies to workbook files"));
    }
    let settings = Settings::load();
    let names = sheetquery_io::xlsx::sheet_names(file).map_err(CliError::import)?;
    print_result(&serde_json::json!(names), &settings)
}

fn cmd_ai_doctor(json: bool) -> Result<(), CliError> {
    let config = ResolvedAIConfig::load();
    let diag = AIDiagnostics::from_resolved(&config);

    if json {
        let out = serde_json::json!({
            "provider": diag.provider,
            "model": diag.model,
            "status": diag.status.as_str(),
            "key_present": diag.key_present,
            "key_source": diag.key_source.as_str(),
            "keychain_available": diag.keychain_available,
            "endpoint": diag.endpoint,
            "blocking_reason": config.blocking_reason,
        });
        println!("{}", serde_json::to_string_pretty(&out).map_err(|e| CliError::error(e.to_string()))?);
    } else {
        print!("{}", diag);
        if let Some(reason) = &config.blocking_reason {
            println!("Blocked:           {}", reason);
        }
    }
    Ok(())
}
