pub mod cohere;
pub mod ollama;
pub mod openai;

use docchat_core::config::{LlmConfig, OllamaConfig};
use docchat_core::Provider;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat-completion provider for a generative backend.
///
/// `api_key` is the already-resolved key for hosted providers; extractive
/// providers have no chat endpoint and are rejected.
pub fn create_provider(
    provider: Provider,
    api_key: Option<&str>,
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    let require_key = |name: &str| {
        api_key
            .map(str::to_string)
            .ok_or_else(|| LlmError::NotConfigured(format!("{name} API key not set")))
    };

    match provider {
        Provider::OpenAi => Ok(Box::new(openai::OpenAiProvider::new(
            require_key("OpenAI")?,
            llm_config.openai_model.clone(),
            llm_config.openai_base_url.clone(),
        ))),
        Provider::Cohere => Ok(Box::new(cohere::CohereProvider::new(
            require_key("Cohere")?,
            llm_config.cohere_model.clone(),
            llm_config.cohere_base_url.clone(),
        ))),
        Provider::Ollama => Ok(Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        ))),
        Provider::HuggingFace | Provider::Extractive => Err(LlmError::NotConfigured(format!(
            "'{}' is an extractive backend, not a chat provider",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_providers_need_a_key() {
        let llm = LlmConfig::default();
        let ollama = OllamaConfig::default();
        assert!(matches!(
            create_provider(Provider::OpenAi, None, &llm, &ollama),
            Err(LlmError::NotConfigured(_))
        ));
        assert!(create_provider(Provider::Cohere, Some("k"), &llm, &ollama).is_ok());
        assert!(create_provider(Provider::Ollama, None, &llm, &ollama).is_ok());
    }

    #[test]
    fn extractive_is_not_a_chat_provider() {
        let llm = LlmConfig::default();
        let ollama = OllamaConfig::default();
        assert!(create_provider(Provider::Extractive, None, &llm, &ollama).is_err());
    }
}
