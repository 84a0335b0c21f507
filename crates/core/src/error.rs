use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown provider: '{0}' (expected one of openai, cohere, huggingface, extractive, ollama)")]
    UnknownProvider(String),

    #[error("unknown personality: '{0}' (expected general assistant, academic or witty)")]
    UnknownPersonality(String),

    #[error("unknown context policy: '{0}' (expected truncate or window)")]
    UnknownContextPolicy(String),
}
