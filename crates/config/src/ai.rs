// AI configuration and secrets management
//
// API keys are stored securely using:
// 1. System keychain (preferred)
// 2. Environment variables (fallback for CI/headless)
//
// Keys are NEVER stored in settings.json

use std::env;

/// Service name for keychain storage
const KEYCHAIN_SERVICE: &str = "sheetquery";

/// Source of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Key retrieved from system keychain
    Keychain,
    /// Key retrieved from environment variable
    Environment,
    /// No key found
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Keychain => "keychain",
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Get the environment variable name for a provider
pub fn env_var_name(provider: &str) -> String {
    format!("SHEETQUERY_{}_KEY", provider.to_uppercase())
}

/// Get the keychain account name for a provider
fn keychain_account(provider: &str) -> String {
    format!("ai/{}", provider.to_lowercase())
}

/// Get an API key for the specified provider
///
/// Checks in order:
/// 1. System keychain
/// 2. Environment variable (SHEETQUERY_OPENAI_KEY, etc.)
pub fn get_api_key(provider: &str) -> KeyLookup {
    // Try keychain first
    #[cfg(feature = "keychain")]
    {
        if let Ok(entry) = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider)) {
            if let Ok(key) = entry.get_password() {
                return KeyLookup {
                    key: Some(key),
                    source: KeySource::Keychain,
                };
            }
        }
    }

    // Fall back to environment variable
    let env_name = env_var_name(provider);
    if let Ok(key) = env::var(&env_name) {
        if !key.is_empty() {
            return KeyLookup {
                key: Some(key),
                source: KeySource::Environment,
            };
        }
    }

    KeyLookup {
        key: None,
        source: KeySource::None,
    }
}

/// Store an API key in the system keychain
#[cfg(feature = "keychain")]
pub fn set_api_key(provider: &str, key: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider))
        .map_err(|e| format!("Failed to create keychain entry: {}", e))?;

    entry
        .set_password(key)
        .map_err(|e| format!("Failed to store key in keychain: {}", e))
}

#[cfg(not(feature = "keychain"))]
pub fn set_api_key(_provider: &str, _key: &str) -> Result<(), String> {
    Err("Keychain support not enabled. Set SHEETQUERY_<PROVIDER>_KEY environment variable instead.".to_string())
}

/// Delete an API key from the system keychain
#[cfg(feature = "keychain")]
pub fn delete_api_key(provider: &str) -> Result<(), String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider))
        .map_err(|e| format!("Failed to access keychain entry: {}", e))?;

    entry
        .delete_credential()
        .map_err(|e| format!("Failed to delete key from keychain: {}", e))
}

#[cfg(not(feature = "keychain"))]
pub fn delete_api_key(_provider: &str) -> Result<(), String> {
    Err("Keychain support not enabled.".to_string())
}

/// Check if keychain support is available
pub fn keychain_available() -> bool {
    #[cfg(feature = "keychain")]
    {
        // Try to create a test entry to verify keychain access
        keyring::Entry::new(KEYCHAIN_SERVICE, "test").is_ok()
    }
    #[cfg(not(feature = "keychain"))]
    {
        false
    }
}

// ============================================================================
// Resolved AI Configuration (single source of truth)
// ============================================================================

/// The effective AI configuration, fully resolved from all sources.
/// This is the single source of truth for runtime AI behavior.
#[derive(Debug, Clone)]
pub struct ResolvedAIConfig {
    /// Effective provider
    pub provider: crate::settings::AIProvider,
    /// Effective model (resolved from settings or provider default)
    pub model: String,
    /// Effective endpoint (resolved with provider default)
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key (if available and provider needs one)
    pub api_key: Option<String>,
    /// Source of the API key
    pub key_source: KeySource,
    /// Overall status
    pub status: AIConfigStatus,
    /// Human-readable reason if not ready
    pub blocking_reason: Option<String>,
}

/// Status of the AI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AIConfigStatus {
    /// AI is disabled (provider = None)
    Disabled,
    /// Configuration is valid and usable
    Ready,
    /// Provider is configured but API key is missing
    MissingKey,
}

impl AIConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Ready => "ready",
            Self::MissingKey => "missing_key",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl ResolvedAIConfig {
    /// Resolve the effective AI configuration from settings.
    /// This is the single entry point for all AI config resolution.
    pub fn from_settings(settings: &crate::settings::AISettings) -> Self {
        let provider = settings.provider;

        // If disabled, return early
        if !provider.is_enabled() {
            return Self {
                provider,
                model: String::new(),
                endpoint: String::new(),
                timeout_secs: settings.timeout_secs,
                api_key: None,
                key_source: KeySource::None,
                status: AIConfigStatus::Disabled,
                blocking_reason: None,
            };
        }

        let model = settings.effective_model().to_string();
        let endpoint = settings.effective_endpoint().to_string();

        // Get API key if needed
        let (api_key, key_source, status, blocking_reason) = if provider.needs_api_key() {
            let lookup = get_api_key(provider.name());
            match lookup.key {
                Some(key) => (Some(key), lookup.source, AIConfigStatus::Ready, None),
                None => (
                    None,
                    KeySource::None,
                    AIConfigStatus::MissingKey,
                    Some(format!(
                        "No API key found. Set via keychain or {}",
                        env_var_name(provider.name())
                    )),
                ),
            }
        } else {
            // Local provider doesn't need a key
            (None, KeySource::None, AIConfigStatus::Ready, None)
        };

        Self {
            provider,
            model,
            endpoint,
            timeout_secs: settings.timeout_secs,
            api_key,
            key_source,
            status,
            blocking_reason,
        }
    }

    /// Load settings and resolve in one call (convenience method)
    pub fn load() -> Self {
        let settings = crate::settings::Settings::load();
        Self::from_settings(&settings.ai)
    }

    /// Provider display name
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

// ============================================================================
// Diagnostics (for CLI doctor and debugging)
// ============================================================================

/// Diagnostic information about AI configuration
#[derive(Debug)]
pub struct AIDiagnostics {
    pub provider: String,
    pub model: String,
    pub status: AIConfigStatus,
    pub key_present: bool,
    pub key_source: KeySource,
    pub keychain_available: bool,
    pub endpoint: String,
}

impl AIDiagnostics {
    /// Create diagnostics from resolved config
    pub fn from_resolved(config: &ResolvedAIConfig) -> Self {
        Self {
            provider: config.provider.name().to_string(),
            model: config.model.clone(),
            status: config.status,
            key_present: config.api_key.is_some(),
            key_source: config.key_source,
            keychain_available: keychain_available(),
            endpoint: config.endpoint.clone(),
        }
    }
}

impl std::fmt::Display for AIDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AI Configuration")?;
        writeln!(f, "──────────────────────────────")?;
        writeln!(f, "Provider:          {}", self.provider)?;
        writeln!(f, "Status:            {}", self.status.as_str())?;
        writeln!(f, "Model:             {}", self.model)?;
        writeln!(f, "Key present:       {}", if self.key_present { "yes" } else { "no" })?;
        writeln!(f, "Key source:        {}", self.key_source.as_str())?;
        writeln!(f, "Keychain available:{}", if self.keychain_available { "yes" } else { "no" })?;
        if !self.endpoint.is_empty() {
            writeln!(f, "Endpoint:          {}", self.endpoint)?;
        }
        Ok(())
    }
}
