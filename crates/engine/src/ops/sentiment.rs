use sheetquery_core::Table;

use super::require_column;
use crate::error::EngineError;
use crate::model::TextModel;

/// Prompt budget for the collected column text.
const MAX_TEXT_CHARS: usize = 4000;

const SYSTEM_PROMPT: &str = "You are a sentiment classifier. Classify the overall \
sentiment of the provided text as positive, negative, mixed, or neutral, with a \
one-sentence justification.";

/// Send the column's text to the model and return its reply verbatim.
pub fn sentiment(
    table: &Table,
    text_column: &str,
    model: &dyn TextModel,
) -> Result<String, EngineError> {
    let column = require_column("sentiment", table, text_column)?;

    let mut text = String::new();
    for v in &column.values {
        if v.is_null() {
            continue;
        }
        let line = v.key_string();
        if text.len() + line.len() + 1 > MAX_TEXT_CHARS {
            // A cell larger than the remaining budget is cut at a char
            // boundary so at least its prefix reaches the model.
            let mut end = MAX_TEXT_CHARS.saturating_sub(text.len() + 1).min(line.len());
            while end > 0 && !line.is_char_boundary(end) {
                end -= 1;
            }
            if end > 0 {
                text.push_str(&line[..end]);
                text.push('\n');
            }
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }

    if text.is_empty() {
        return Err(EngineError::Compute(format!(
            "sentiment: column '{text_column}' contains no text"
        )));
    }

    model
        .complete(SYSTEM_PROMPT, &text)
        .map_err(|e| EngineError::Upstream(e.to_string()))
}
