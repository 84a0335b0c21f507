//! The answer-engine seam: one trait over extractive and generative backends.

use std::sync::Arc;

use async_trait::async_trait;
use docchat_core::{BackendKind, Config, Personality, Provider};
use tracing::info;

use crate::context::ContextPolicy;
use crate::extractive::{HuggingFaceQa, LexicalExtractor};
use crate::generative::GenerativeEngine;
use crate::provider::LlmError;
use crate::providers::create_provider;

/// Answers a question against a corpus. Built once per successful ingest.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(&self, corpus: &str, question: &str) -> Result<String, AnswerError>;

    fn provider(&self) -> Provider;
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("no document content to answer from")]
    NoContent,
    #[error("an API key is required for provider '{0}'")]
    MissingCredential(Provider),
    #[error("backend error: {0}")]
    Backend(#[from] LlmError),
    #[error("no answer found in the documents")]
    NoAnswerFound,
    #[error("prompt template error: {0}")]
    Prompt(#[from] minijinja::Error),
}

/// Per-session choices that shape an engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub provider: Provider,
    /// Key entered for this session. Wins over the server-wide key.
    pub api_key: Option<String>,
    pub personality: Personality,
    pub temperature: f32,
}

/// Session key first, then the configured key. Blank keys count as absent.
pub fn resolve_api_key(settings: &EngineSettings, config: &Config) -> Option<String> {
    settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or_else(|| {
            config
                .llm
                .api_key_for(settings.provider)
                .map(str::trim)
                .filter(|k| !k.is_empty())
        })
        .map(str::to_string)
}

/// Fail fast when a hosted provider has no key. Makes no network call.
pub fn check_credentials(settings: &EngineSettings, config: &Config) -> Result<(), AnswerError> {
    if settings.provider.requires_api_key() && resolve_api_key(settings, config).is_none() {
        return Err(AnswerError::MissingCredential(settings.provider));
    }
    Ok(())
}

/// Construct the engine for `settings.provider`.
pub fn build_engine(
    settings: &EngineSettings,
    config: &Config,
) -> Result<Arc<dyn AnswerEngine>, AnswerError> {
    check_credentials(settings, config)?;
    let api_key = resolve_api_key(settings, config);
    let policy = ContextPolicy::from_config(&config.qa);

    info!(
        provider = %settings.provider,
        kind = ?settings.provider.kind(),
        personality = %settings.personality,
        "building answer engine"
    );

    let engine: Arc<dyn AnswerEngine> = match (settings.provider, settings.provider.kind()) {
        (Provider::HuggingFace, _) => Arc::new(HuggingFaceQa::new(
            api_key.ok_or(AnswerError::MissingCredential(Provider::HuggingFace))?,
            config.llm.huggingface_qa_model.clone(),
            config.llm.huggingface_base_url.clone(),
            policy,
        )),
        (_, BackendKind::ExtractiveQa) => Arc::new(LexicalExtractor::new()),
        (provider, _) => {
            let llm = create_provider(provider, api_key.as_deref(), &config.llm, &config.ollama)?;
            Arc::new(GenerativeEngine::new(
                llm,
                provider,
                settings.personality,
                settings.temperature,
                config.llm.max_tokens,
                policy,
            )?)
        }
    };
    Ok(engine)
}
