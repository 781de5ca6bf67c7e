use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, ProviderKind, DEFAULT_TIMEOUT};

/// Application configuration loaded from environment variables.
/// Nothing is strictly required to start: without an API key the server runs,
/// and every generation call fails with a configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("LLM_PROVIDER") {
            Some(name) => name
                .parse::<ProviderKind>()
                .map_err(anyhow::Error::msg)
                .context("LLM_PROVIDER is invalid")?,
            None => ProviderKind::default(),
        };

        let timeout = match var("LLM_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => DEFAULT_TIMEOUT,
        };

        let mut llm = LlmSettings::new(provider).with_timeout(timeout);
        if let Some(api_key) = var("LLM_API_KEY").or_else(|| var("API_KEY")) {
            llm = llm.with_api_key(api_key);
        }
        if let Some(base_url) = var("LLM_BASE_URL") {
            llm = llm.with_base_url(base_url);
        }
        if let Some(model) = var("LLM_MODEL") {
            llm = llm.with_model(model);
        }

        Ok(Config {
            llm,
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
