use std::fmt;

/// Transport-level failure from a model client.
#[derive(Debug)]
pub struct ModelError(pub String);

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ModelError {}

/// Seam for the language-model client.
///
/// The engine never talks to the network; callers hand it an implementation
/// (the llm crate's blocking client, or a stub in tests).
pub trait TextModel {
    /// Send a system + user prompt, return the completion text.
    fn complete(&self, system: &str, user: &str) -> Result<String, ModelError>;
}
