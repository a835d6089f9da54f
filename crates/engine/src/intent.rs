//! Intent resolution: turn a natural-language question into one call from
//! the registry. The catalog section of the prompt is generated from
//! [`crate::registry::OPERATIONS`], so the model can only be offered what
//! the dispatcher will accept.

use std::fmt::Write as _;

use crate::error::EngineError;
use crate::model::TextModel;
use crate::registry::OPERATIONS;

const SYSTEM_PROMPT: &str = "You translate spreadsheet questions into exactly one \
function call from a fixed catalog. Reply with the call only: no prose, no \
markdown, no code fences, no explanation.";

/// The operation catalog rendered for the prompt, one line per entry.
pub fn catalog_text() -> String {
    let mut out = String::new();
    for op in OPERATIONS {
        let params: Vec<String> = op
            .params
            .iter()
            .map(|p| {
                if p.required {
                    p.name.to_string()
                } else {
                    format!("[{}]", p.name)
                }
            })
            .collect();
        let ellipsis = if op.variadic { ", ..." } else { "" };
        let _ = writeln!(
            out,
            "- {}({}{}): {} e.g. {}",
            op.name,
            params.join(", "),
            ellipsis,
            op.summary,
            op.example
        );
    }
    out
}

/// The user-role prompt: catalog, the table's columns, and the question.
pub fn build_prompt(columns: &[String], query: &str) -> String {
    format!(
        "Available operations:\n{}\nThe table has these columns: {}\n\n\
Question: {}\n\n\
Answer with exactly one call from the catalog, using the column names as \
given.",
        catalog_text(),
        columns.join(", "),
        query
    )
}

/// Ask the model to pick one call for `query`. The reply is returned as-is;
/// parsing and validation belong to the dispatcher.
pub fn resolve_intent(
    columns: &[String],
    query: &str,
    model: &dyn TextModel,
) -> Result<String, EngineError> {
    let prompt = build_prompt(columns, query);
    model
        .complete(SYSTEM_PROMPT, &prompt)
        .map(|reply| reply.trim().to_string())
        .map_err(|e| EngineError::Upstream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelError;

    struct CapturingModel;

    impl TextModel for CapturingModel {
        fn complete(&self, _system: &str, user: &str) -> Result<String, ModelError> {
            Ok(format!("  overall_average(Salary)\n\n[{user}]"))
        }
    }

    struct FixedModel(&'static str);

    impl TextModel for FixedModel {
        fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
            Ok(self.0.to_string())
        }
    }

    struct DownModel;

    impl TextModel for DownModel {
        fn complete(&self, _system: &str, _user: &str) -> Result<String, ModelError> {
            Err(ModelError("503 from provider".into()))
        }
    }

    fn cols() -> Vec<String> {
        vec!["Salary".to_string(), "Department".to_string()]
    }

    #[test]
    fn test_catalog_lists_every_operation() {
        let catalog = catalog_text();
        for op in OPERATIONS {
            assert!(catalog.contains(op.name), "missing {}", op.name);
            assert!(catalog.contains(op.example), "missing example for {}", op.name);
        }
    }

    #[test]
    fn test_catalog_marks_optional_params() {
        let catalog = catalog_text();
        assert!(catalog.contains("[drop_nulls]"));
        assert!(catalog.contains("[on_column]"));
        assert!(catalog.contains("unpivot_table(value_column, ...)"));
    }

    #[test]
    fn test_prompt_carries_columns_and_question() {
        let prompt = build_prompt(&cols(), "what is the average salary?");
        assert!(prompt.contains("Salary, Department"));
        assert!(prompt.contains("what is the average salary?"));
        assert!(prompt.contains("exactly one call"));
    }

    #[test]
    fn test_resolve_trims_reply() {
        let reply = resolve_intent(&cols(), "avg?", &FixedModel("  summary()\n")).unwrap();
        assert_eq!(reply, "summary()");
    }

    #[test]
    fn test_resolve_passes_prompt_through() {
        let reply = resolve_intent(&cols(), "average salary", &CapturingModel).unwrap();
        assert!(reply.starts_with("overall_average(Salary)"));
        assert!(reply.contains("average salary"));
        assert!(reply.contains("Salary, Department"));
    }

    #[test]
    fn test_model_failure_is_upstream() {
        let err = resolve_intent(&cols(), "avg?", &DownModel).unwrap_err();
        assert_eq!(err.kind(), "upstream");
        assert!(err.to_string().contains("503"));
    }
}
