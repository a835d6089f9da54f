//! Chat-completions client for OpenAI-compatible providers.
//!
//! Blocking reqwest client (no Tokio runtime required). Groq, OpenAI and
//! Ollama all speak the same `/chat/completions` wire format, so one client
//! covers every provider the settings can name.

mod client;

pub use client::{ChatClient, LlmError};
