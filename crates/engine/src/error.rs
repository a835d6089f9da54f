use std::fmt;

/// Engine failure taxonomy. Every failure is synchronous and caller-visible;
/// nothing is retried and no partial results are returned.
#[derive(Debug)]
pub enum EngineError {
    /// A referenced column is absent from the table's current schema.
    ColumnNotFound { op: &'static str, column: String },
    /// A required table slot is empty.
    MissingTable { slot: &'static str },
    /// Invalid enum value, wrong arity, or unparsable call expression.
    Argument(String),
    /// Division by zero, empty join-key intersection, incompatible aggregate
    /// target, and similar evaluation failures.
    Compute(String),
    /// The language-model call failed or returned unusable content.
    Upstream(String),
    /// The resolved operation name is not in the registry.
    UnknownOperation(String),
}

impl EngineError {
    /// Stable kind string carried to the boundary alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } | Self::MissingTable { .. } => "schema",
            Self::Argument(_) => "argument",
            Self::Compute(_) => "compute",
            Self::Upstream(_) => "upstream",
            Self::UnknownOperation(_) => "unknown_operation",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotFound { op, column } => {
                write!(f, "{op}: column '{column}' not found in table")
            }
            Self::MissingTable { slot } => write!(f, "no {slot} table loaded"),
            Self::Argument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Compute(msg) => write!(f, "{msg}"),
            Self::Upstream(msg) => write!(f, "model call failed: {msg}"),
            Self::UnknownOperation(name) => {
                write!(f, "unknown operation '{name}' (not in the registry)")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings() {
        let e = EngineError::ColumnNotFound {
            op: "math_single",
            column: "Salary".into(),
        };
        assert_eq!(e.kind(), "schema");
        assert!(e.to_string().contains("Salary"));
        assert!(e.to_string().contains("math_single"));

        assert_eq!(EngineError::Argument("x".into()).kind(), "argument");
        assert_eq!(EngineError::Compute("x".into()).kind(), "compute");
        assert_eq!(EngineError::Upstream("x".into()).kind(), "upstream");
        assert_eq!(
            EngineError::UnknownOperation("open".into()).kind(),
            "unknown_operation"
        );
        assert_eq!(EngineError::MissingTable { slot: "secondary" }.kind(), "schema");
    }
}
