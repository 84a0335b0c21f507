//! Extractive answer engines: the answer is a span of the corpus.

use async_trait::async_trait;
use docchat_core::Provider;
use docchat_ingest::document::chunker::sentence_spans;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::context::ContextPolicy;
use crate::engine::{AnswerEngine, AnswerError};
use crate::lexical;
use crate::provider::LlmError;

/// Picks the corpus sentence sharing the most weighted terms with the
/// question. Runs locally and never touches the network.
#[derive(Debug, Default, Clone)]
pub struct LexicalExtractor;

impl LexicalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// The best sentence as a slice of `corpus`.
    pub fn extract<'a>(&self, corpus: &'a str, question: &str) -> Result<&'a str, AnswerError> {
        if corpus.trim().is_empty() {
            return Err(AnswerError::NoContent);
        }
        let spans = sentence_spans(corpus);
        let sentences: Vec<&str> = spans.iter().map(|r| &corpus[r.clone()]).collect();
        let scores = lexical::score_passages(&sentences, question);
        let best = lexical::best_index(&scores).ok_or(AnswerError::NoAnswerFound)?;
        debug!(sentences = sentences.len(), best, score = scores[best], "extracted answer span");
        Ok(sentences[best])
    }
}

#[async_trait]
impl AnswerEngine for LexicalExtractor {
    async fn answer(&self, corpus: &str, question: &str) -> Result<String, AnswerError> {
        self.extract(corpus, question).map(str::to_string)
    }

    fn provider(&self) -> Provider {
        Provider::Extractive
    }
}

/// One candidate from the Inference API question-answering task.
#[derive(Debug, Deserialize)]
struct QaSpan {
    answer: String,
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QaResponse {
    One(QaSpan),
    Many(Vec<QaSpan>),
}

impl QaResponse {
    fn best(self) -> Option<QaSpan> {
        match self {
            QaResponse::One(span) => Some(span),
            QaResponse::Many(spans) => spans
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }
}

/// Hosted extractive QA via the Hugging Face Inference API.
pub struct HuggingFaceQa {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    policy: ContextPolicy,
}

impl HuggingFaceQa {
    pub fn new(api_key: String, model: String, base_url: String, policy: ContextPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
        }
    }
}

#[async_trait]
impl AnswerEngine for HuggingFaceQa {
    async fn answer(&self, corpus: &str, question: &str) -> Result<String, AnswerError> {
        if corpus.trim().is_empty() {
            return Err(AnswerError::NoContent);
        }
        let context = self.policy.select(corpus, question);
        let url = format!("{}/models/{}", self.base_url, self.model);
        let body = json!({
            "inputs": { "question": question, "context": context.as_ref() },
        });

        debug!(model = %self.model, context_chars = context.chars().count(), "Hugging Face QA request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body }.into());
        }

        let parsed: QaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;
        let span = parsed.best().ok_or(AnswerError::NoAnswerFound)?;
        let answer = span.answer.trim();
        if answer.is_empty() {
            return Err(AnswerError::NoAnswerFound);
        }
        Ok(answer.to_string())
    }

    fn provider(&self) -> Provider {
        Provider::HuggingFace
    }
}
