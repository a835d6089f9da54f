// Configuration and secrets

pub mod ai;
pub mod settings;

pub use ai::{AIConfigStatus, AIDiagnostics, KeySource, ResolvedAIConfig};
pub use settings::{AIProvider, AISettings, Settings};
