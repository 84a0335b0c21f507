use async_trait::async_trait;
use docchat_core::{Personality, Provider};
use tracing::{debug, info};

use crate::context::ContextPolicy;
use crate::engine::{AnswerEngine, AnswerError};
use crate::prompt::PromptBuilder;
use crate::provider::{LlmError, LlmProvider, Message};

/// Answers by prompting a chat-completion backend with the corpus as context.
pub struct GenerativeEngine {
    llm: Box<dyn LlmProvider>,
    provider: Provider,
    prompts: PromptBuilder,
    personality: Personality,
    temperature: f32,
    max_tokens: u32,
    policy: ContextPolicy,
}

impl GenerativeEngine {
    pub fn new(
        llm: Box<dyn LlmProvider>,
        provider: Provider,
        personality: Personality,
        temperature: f32,
        max_tokens: u32,
        policy: ContextPolicy,
    ) -> Result<Self, AnswerError> {
        Ok(Self {
            llm,
            provider,
            prompts: PromptBuilder::new()?,
            personality,
            temperature: temperature.clamp(0.0, 1.0),
            max_tokens,
            policy,
        })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[async_trait]
impl AnswerEngine for GenerativeEngine {
    async fn answer(&self, corpus: &str, question: &str) -> Result<String, AnswerError> {
        if corpus.trim().is_empty() {
            return Err(AnswerError::NoContent);
        }

        let context = self.policy.select(corpus, question);
        let prompt = self.prompts.render(self.personality, &context, question)?;
        debug!(
            provider = %self.provider,
            prompt_chars = prompt.chars().count(),
            "sending answer prompt"
        );

        let response = self
            .llm
            .complete(vec![Message::user(prompt)], self.temperature, self.max_tokens)
            .await?;

        let answer = response.trim();
        if answer.is_empty() {
            return Err(LlmError::ParseError("empty completion".into()).into());
        }
        info!(provider = %self.provider, answer_chars = answer.chars().count(), "answer generated");
        Ok(answer.to_string())
    }

    fn provider(&self) -> Provider {
        self.provider
    }
}
