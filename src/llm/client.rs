use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ChatMessage, ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "http://localhost:5000/v1";
const DEFAULT_MODEL: &str = "deepseek-reasoner";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Primes R1-style models to open their reasoning block.
const SYSTEM_PRIMER: &str = "<think>\n";
const TEMPERATURE: f64 = 0.6;
const TOP_P: f64 = 0.95;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API call failed with status code {code}: {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GROUNDWORK_BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("GROUNDWORK_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
}

/// Abstraction over a prompt-in, text-out language model.
/// Implemented by `ChatClient` for production; mock implementations used in tests.
pub trait ModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
///
/// Configuration via environment variables:
/// - `GROUNDWORK_BASE_URL`: API base, default `http://localhost:5000/v1`
/// - `GROUNDWORK_API_KEY`: bearer token, omitted from requests when unset
/// - `GROUNDWORK_MODEL`: model name, default `deepseek-reasoner`
/// - `GROUNDWORK_TIMEOUT_SECS`: per-request timeout, default 120
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    api_key: Option<ApiKey>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn from_env(http: Client) -> Result<Self, ConfigError> {
        Self::from_lookup(http, |name| env::var(name).ok())
    }

    fn from_lookup(
        http: Client,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = var("GROUNDWORK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url)?;

        let timeout = match var("GROUNDWORK_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            http,
            api_key: var("GROUNDWORK_API_KEY").map(ApiKey),
            model: var("GROUNDWORK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            http,
            api_key: api_key.map(|k| ApiKey(k.to_string())),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, prompt: &str) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::new("system", SYSTEM_PRIMER),
                ChatMessage::new("user", prompt),
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        };

        let mut builder = self
            .http
            .post(&url)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(&key.0);
        }

        let response = builder.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if let Ok(body) = serde_json::from_str::<ChatResponse>(&text)
                && let Some(message) = body.error.and_then(|e| e.message)
            {
                warn!(status = %status, "chat completion failed");
                return Err(LlmError::Api {
                    code: status.as_u16(),
                    message,
                });
            }
            let end = text.floor_char_boundary(200);
            warn!(status = %status, "chat completion failed (no structured body)");
            return Err(LlmError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {}", &text[..end]),
            });
        }

        let body: ChatResponse = serde_json::from_str(&text)?;

        if let Some(err) = &body.error {
            warn!(status = %status, "chat completion error in 200 response");
            return Err(LlmError::Api {
                code: status.as_u16(),
                message: err
                    .message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        debug!(model = %self.model, bytes = text.len(), "chat completion received");
        Ok(body)
    }
}

impl ModelClient for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.chat(prompt).await?;
        Ok(extract_content(response))
    }
}

fn extract_content(response: ChatResponse) -> String {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    content.unwrap_or_else(|| {
        warn!("chat completion returned no content");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let client = ChatClient::from_lookup(Client::new(), lookup(&[])).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert!(client.api_key.is_none());
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn reads_overrides_and_trims_trailing_slash() {
        let client = ChatClient::from_lookup(
            Client::new(),
            lookup(&[
                ("GROUNDWORK_BASE_URL", "https://api.example.com/v1/"),
                ("GROUNDWORK_API_KEY", " secret "),
                ("GROUNDWORK_MODEL", "r1"),
                ("GROUNDWORK_TIMEOUT_SECS", "30"),
            ]),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model(), "r1");
        assert_eq!(client.api_key.as_ref().map(|k| k.0.as_str()), Some("secret"));
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let client = ChatClient::from_lookup(
            Client::new(),
            lookup(&[("GROUNDWORK_MODEL", "  "), ("GROUNDWORK_API_KEY", "")]),
        )
        .unwrap();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert!(client.api_key.is_none());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = ChatClient::from_lookup(
            Client::new(),
            lookup(&[("GROUNDWORK_BASE_URL", "not a url")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ChatClient::from_lookup(
            Client::new(),
            lookup(&[("GROUNDWORK_TIMEOUT_SECS", "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let client =
            ChatClient::with_base_url(Client::new(), "http://localhost", Some("sk-secret"));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
