/// LLM Client: the single point of entry for remote text-generation calls.
///
/// No other module talks to a vendor API directly. Each vendor protocol lives in
/// its own submodule and implements `CompletionProvider`; `build_provider` picks
/// one from `LlmSettings` at startup.
///
/// Calls are single-shot. There is no retry loop here: the generation layer owns
/// the unit of work and retry policy belongs to whoever called it.
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod prompts;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response envelope: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Which vendor protocol to speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// Chat-completions compatible endpoint (OpenAI, DashScope compatible-mode, ...).
    #[default]
    OpenAi,
    /// Google `generateContent` with a machine-checked response schema.
    Gemini,
    /// Anthropic Messages API; JSON shape enforced by prompt only.
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://dashscope.aliyuncs.com/compatible-mode/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "qwen-flash",
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::Anthropic => "claude-sonnet-4-5",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "qwen" | "dashscope" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(format!(
                "unknown LLM provider '{other}' (expected openai, gemini or anthropic)"
            )),
        }
    }
}

/// Read-only provider settings, resolved once at startup and passed in explicitly.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout: Duration,
}

impl LlmSettings {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            base_url: None,
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key, if one is set and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Endpoint base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// One system + user exchange, asking for a JSON-only reply.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    /// Response schema hint. Only forwarded by providers with structured output.
    pub schema: Option<&'a Value>,
}

/// A remote text-generation capability. One implementation per vendor protocol.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Whether the remote side accepts a machine-checked response schema.
    fn supports_structured_output(&self) -> bool {
        false
    }

    /// Sends one non-streaming request and returns the raw reply text.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}

/// Builds the provider selected by `settings`.
pub fn build_provider(settings: &LlmSettings) -> Result<Arc<dyn CompletionProvider>, LlmError> {
    let provider: Arc<dyn CompletionProvider> = match settings.provider {
        ProviderKind::OpenAi => Arc::new(openai::OpenAiProvider::new(settings)?),
        ProviderKind::Gemini => Arc::new(gemini::GeminiProvider::new(settings)?),
        ProviderKind::Anthropic => Arc::new(anthropic::AnthropicProvider::new(settings)?),
    };
    Ok(provider)
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a provider response into `T`, or into `LlmError::Api` on a non-2xx status.
/// All three vendors report failures as `{"error": {"message": ...}}`.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("LLM API returned {}: {}", status, body);
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// In-process stand-in for a vendor endpoint, used by the provider wire tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use serde_json::Value;

    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub path: String,
        pub headers: HeaderMap,
        pub body: Value,
    }

    pub struct StubServer {
        pub base_url: String,
        recorded: Arc<Mutex<Vec<Recorded>>>,
    }

    impl StubServer {
        /// Answers every request with `status` and `reply`, recording what it received.
        pub async fn start(status: StatusCode, reply: Value) -> Self {
            let recorded = Arc::new(Mutex::new(Vec::new()));
            let sink = recorded.clone();

            let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: Bytes| {
                let sink = sink.clone();
                let reply = reply.clone();
                async move {
                    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
                    sink.lock().unwrap().push(Recorded {
                        path: uri.path().to_string(),
                        headers,
                        body,
                    });
                    (status, Json(reply))
                }
            });

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                base_url: format!("http://{addr}"),
                recorded,
            }
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.recorded.lock().unwrap().clone()
        }
    }

    /// A URL that accepts connections and never answers.
    pub async fn hanging_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    /// A URL nothing is listening on.
    pub async fn closed_port_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_provider_kind_parses_aliases() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("DashScope".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" gemini ".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert!("mistral".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_settings_fall_back_to_provider_defaults() {
        let settings = LlmSettings::new(ProviderKind::OpenAi);
        assert_eq!(
            settings.base_url(),
            "https://dashscope.aliyuncs.com/compatible-mode/v1"
        );
        assert_eq!(settings.model(), "qwen-flash");
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert!(settings.credential().is_none());
    }

    #[test]
    fn test_settings_overrides_win_and_trailing_slash_is_trimmed() {
        let settings = LlmSettings::new(ProviderKind::Gemini)
            .with_base_url("http://localhost:9000/v1/")
            .with_model("gemini-test")
            .with_api_key("k");
        assert_eq!(settings.base_url(), "http://localhost:9000/v1");
        assert_eq!(settings.model(), "gemini-test");
        assert_eq!(settings.credential(), Some("k"));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let settings = LlmSettings::new(ProviderKind::Anthropic).with_api_key("   ");
        assert!(settings.credential().is_none());
    }

    #[test]
    fn test_build_provider_selects_by_kind() {
        for kind in [
            ProviderKind::OpenAi,
            ProviderKind::Gemini,
            ProviderKind::Anthropic,
        ] {
            let provider = build_provider(&LlmSettings::new(kind)).unwrap();
            assert_eq!(provider.name(), kind.as_str());
            assert_eq!(provider.model(), kind.default_model());
        }
    }

    #[test]
    fn test_only_gemini_advertises_structured_output() {
        let structured: Vec<_> = [
            ProviderKind::OpenAi,
            ProviderKind::Gemini,
            ProviderKind::Anthropic,
        ]
        .into_iter()
        .filter(|kind| {
            build_provider(&LlmSettings::new(*kind))
                .unwrap()
                .supports_structured_output()
        })
        .collect();
        assert_eq!(structured, vec![ProviderKind::Gemini]);
    }
}
