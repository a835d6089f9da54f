use std::time::Duration;

use sheetquery_config::{AIConfigStatus, ResolvedAIConfig};
use sheetquery_engine::{ModelError, TextModel};

/// Chat-completions client (blocking).
#[derive(Clone, Debug)]
pub struct ChatClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

/// Error type for model calls.
#[derive(Debug)]
pub enum LlmError {
    /// Provider disabled or key missing
    NotConfigured(String),
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// Response did not carry a completion
    Parse(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::NotConfigured(msg) => write!(f, "AI not configured: {}", msg),
            LlmError::Network(msg) => write!(f, "Network error: {}", msg),
            LlmError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            LlmError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

impl ChatClient {
    /// Build a client from resolved configuration. Fails when the provider
    /// is disabled or its key is missing.
    pub fn from_config(config: &ResolvedAIConfig) -> Result<Self, LlmError> {
        match config.status {
            AIConfigStatus::Ready => {}
            AIConfigStatus::Disabled => {
                return Err(LlmError::NotConfigured(
                    "no AI provider selected".to_string(),
                ))
            }
            AIConfigStatus::MissingKey => {
                return Err(LlmError::NotConfigured(
                    config
                        .blocking_reason
                        .clone()
                        .unwrap_or_else(|| "API key missing".to_string()),
                ))
            }
        }

        Ok(Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            config.api_key.clone(),
            config.timeout_secs,
        ))
    }

    /// Create a client with explicit endpoint, model and key.
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("shq/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One chat-completion round trip.
    pub fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Http(status, body));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        extract_completion(&json)
    }
}

/// Pull the first choice's message content out of a chat response.
fn extract_completion(json: &serde_json::Value) -> Result<String, LlmError> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| LlmError::Parse("response has no choices[0].message.content".to_string()))
}

impl TextModel for ChatClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, ModelError> {
        self.chat(system, user).map_err(|e| ModelError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    // ── extract_completion ──────────────────────────────────────────

    #[test]
    fn test_extract_completion() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  summary()\n" } }
            ]
        });
        assert_eq!(extract_completion(&json).unwrap(), "summary()");
    }

    #[test]
    fn test_extract_completion_missing_choices() {
        let json = serde_json::json!({ "error": { "message": "overloaded" } });
        let err = extract_completion(&json).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    // ── wire format (httpmock) ──────────────────────────────────────

    #[test]
    fn test_chat_round_trip() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .json_body_partial(r#"{ "model": "llama-3.1-8b-instant", "temperature": 0 }"#);
            then.status(200).json_body(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "overall_average(Salary)" } }
                ]
            }));
        });

        let client = ChatClient::new(
            format!("{}/v1", server.base_url()),
            "llama-3.1-8b-instant".to_string(),
            Some("test-key".to_string()),
            5,
        );
        let reply = client.chat("system", "average salary?").unwrap();

        mock.assert();
        assert_eq!(reply, "overall_average(Salary)");
    }

    #[test]
    fn test_chat_http_error_carries_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("rate limited");
        });

        let client = ChatClient::new(
            format!("{}/v1", server.base_url()),
            "m".to_string(),
            None,
            5,
        );
        match client.chat("s", "u").unwrap_err() {
            LlmError::Http(429, body) => assert_eq!(body, "rate limited"),
            other => panic!("expected Http(429), got {other:?}"),
        }
    }

    #[test]
    fn test_chat_without_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [ { "message": { "content": "summary()" } } ]
            }));
        });

        // Local providers run keyless; the request must still succeed
        let client = ChatClient::new(format!("{}/v1", server.base_url()), "m".to_string(), None, 5);
        assert_eq!(client.chat("s", "u").unwrap(), "summary()");
        mock.assert();
    }

    #[test]
    fn test_from_config_rejects_disabled() {
        let config = ResolvedAIConfig::from_settings(&sheetquery_config::AISettings::default());
        let err = ChatClient::from_config(&config).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }
}
