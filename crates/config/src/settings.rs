// Application settings
// Loaded from ~/.config/sheetquery/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIProvider {
    /// AI features disabled (default)
    #[default]
    None,
    /// Local model via Ollama (OpenAI-compatible endpoint)
    Local,
    /// OpenAI API
    #[serde(rename = "openai")]
    OpenAI,
    /// Groq API
    Groq,
}

impl AIProvider {
    /// Returns true if AI features are enabled
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AIProvider::None)
    }

    /// Returns true if this provider requires an API key
    pub fn needs_api_key(&self) -> bool {
        matches!(self, AIProvider::OpenAI | AIProvider::Groq)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AIProvider::None => "none",
            AIProvider::Local => "local",
            AIProvider::OpenAI => "openai",
            AIProvider::Groq => "groq",
        }
    }

    /// Returns the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            AIProvider::None => "",
            AIProvider::Local => "llama3:8b",
            AIProvider::OpenAI => "gpt-4o-mini",
            AIProvider::Groq => "llama-3.1-8b-instant",
        }
    }

    /// Base URL of the provider's OpenAI-compatible API
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            AIProvider::None => "",
            AIProvider::Local => "http://localhost:11434/v1",
            AIProvider::OpenAI => "https://api.openai.com/v1",
            AIProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }
}

/// AI-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AISettings {
    /// Selected AI provider
    pub provider: AIProvider,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Custom endpoint override (Ollama URL, proxies)
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            provider: AIProvider::None,
            model: String::new(), // Empty = use provider default
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

impl AISettings {
    /// Get the effective model (user-specified or provider default)
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    /// Get the effective endpoint (user override or provider default)
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Output
    #[serde(rename = "output.maxRows")]
    pub max_output_rows: Option<usize>, // None = unlimited

    #[serde(rename = "output.pretty")]
    pub pretty_output: bool,

    // AI
    #[serde(rename = "ai", default)]
    pub ai: AISettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_output_rows: None,
            pretty_output: true,
            ai: AISettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetquery");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file();
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error parsing settings.json: {}", e);
                        eprintln!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(&path, json).map_err(|e| e.to_string())
    }

    /// Create default settings file with comments
    fn create_default_file(&self) {
        let path = Self::config_path();

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Output
    "output.maxRows": null,
    "output.pretty": true,

    // AI provider ("none", "local", "openai", "groq")
    "ai": {
        "provider": "none",
        "model": "",
        "endpoint": null,
        "timeout_secs": 30
    }
}
"#;

        if let Err(e) = fs::write(&path, default_config) {
            eprintln!("Error writing default settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_model_falls_back_to_provider_default() {
        let mut ai = AISettings {
            provider: AIProvider::Groq,
            ..Default::default()
        };
        assert_eq!(ai.effective_model(), "llama-3.1-8b-instant");

        ai.model = "llama-3.3-70b-versatile".to_string();
        assert_eq!(ai.effective_model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_effective_endpoint_override() {
        let mut ai = AISettings {
            provider: AIProvider::Local,
            ..Default::default()
        };
        assert_eq!(ai.effective_endpoint(), "http://localhost:11434/v1");

        ai.endpoint = Some("http://10.0.0.2:11434/v1".to_string());
        assert_eq!(ai.effective_endpoint(), "http://10.0.0.2:11434/v1");
    }

    #[test]
    fn test_provider_key_requirements() {
        assert!(!AIProvider::None.needs_api_key());
        assert!(!AIProvider::Local.needs_api_key());
        assert!(AIProvider::OpenAI.needs_api_key());
        assert!(AIProvider::Groq.needs_api_key());
    }

    #[test]
    fn test_settings_parse_with_comments() {
        let raw = r#"{
    // keep it simple
    "output.pretty": false,
    "ai": { "provider": "groq" }
}"#;
        let cleaned: String = raw
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        let settings: Settings = serde_json::from_str(&cleaned).unwrap();
        assert!(!settings.pretty_output);
        assert_eq!(settings.ai.provider, AIProvider::Groq);
    }
}
