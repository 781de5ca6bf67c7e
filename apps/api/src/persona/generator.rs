//! Persona generation: compose → one provider call → parse.
//!
//! Every call is self-contained. The generator holds read-only settings and a
//! shared provider, so concurrent calls never see each other's results.
//! Nothing is retried here.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::llm_client::{
    build_provider, strip_json_fences, CompletionProvider, CompletionRequest, LlmError,
    LlmSettings,
};
use crate::persona::composer::compose;
use crate::persona::types::{
    GenerationOptions, PersonaCategory, PersonaProfile, EXPECTED_POSTS, EXPECTED_TAGS,
};

#[derive(Debug, Error)]
pub enum MalformedReason {
    #[error("reply is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("reply does not match the persona shape: {0}")]
    ShapeMismatch(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM is not configured: {0}")]
    Configuration(String),

    #[error("LLM transport failed: {0}")]
    Transport(#[source] LlmError),

    #[error("LLM returned no content")]
    EmptyResponse,

    #[error("LLM returned a malformed persona: {0}")]
    MalformedResponse(#[from] MalformedReason),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyContent => GenerationError::EmptyResponse,
            other => GenerationError::Transport(other),
        }
    }
}

#[derive(Clone)]
pub struct PersonaGenerator {
    settings: LlmSettings,
    provider: Arc<dyn CompletionProvider>,
}

impl PersonaGenerator {
    pub fn new(settings: LlmSettings, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { settings, provider }
    }

    /// Builds the provider named in `settings` and wraps it.
    pub fn from_settings(settings: LlmSettings) -> Result<Self, LlmError> {
        let provider = build_provider(&settings)?;
        Ok(Self::new(settings, provider))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn is_configured(&self) -> bool {
        self.settings.credential().is_some()
    }

    /// Generates one persona. `keyword` must already be non-blank.
    pub async fn generate(
        &self,
        keyword: &str,
        category: PersonaCategory,
        options: GenerationOptions,
    ) -> Result<PersonaProfile, GenerationError> {
        let result = self.run(keyword, category, options).await;
        if let Err(e) = &result {
            error!(
                provider = self.provider.name(),
                category = category.as_str(),
                "Persona generation failed: {e:?}"
            );
        }
        result
    }

    async fn run(
        &self,
        keyword: &str,
        category: PersonaCategory,
        options: GenerationOptions,
    ) -> Result<PersonaProfile, GenerationError> {
        if !self.is_configured() {
            return Err(GenerationError::Configuration(
                "API key is missing".to_string(),
            ));
        }

        let prompt = compose(keyword, category, options);
        let schema = self
            .provider
            .supports_structured_output()
            .then(PersonaProfile::response_schema);

        info!(
            provider = self.provider.name(),
            model = self.provider.model(),
            category = category.as_str(),
            structured = schema.is_some(),
            "Generating persona"
        );

        let text = self
            .provider
            .complete(&CompletionRequest {
                system: prompt.system,
                user: &prompt.user,
                schema: schema.as_ref(),
            })
            .await?;

        let profile = parse_profile(&text)?;

        if !EXPECTED_TAGS.contains(&profile.tags.len()) {
            warn!(
                "Persona has {} tags (expected {}-{})",
                profile.tags.len(),
                EXPECTED_TAGS.start(),
                EXPECTED_TAGS.end()
            );
        }
        if profile.posts.len() != EXPECTED_POSTS {
            warn!(
                "Persona has {} posts (expected {})",
                profile.posts.len(),
                EXPECTED_POSTS
            );
        }

        info!("Generated persona '{}'", profile.id_name);
        Ok(profile)
    }
}

/// Parses a raw reply into a profile, all or nothing.
pub fn parse_profile(text: &str) -> Result<PersonaProfile, GenerationError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(text).map_err(MalformedReason::NotJson)?;
    let profile = serde_json::from_value(value).map_err(MalformedReason::ShapeMismatch)?;
    Ok(profile)
}
