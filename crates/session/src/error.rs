use docchat_core::Provider;
use docchat_llm::AnswerError;

use crate::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(SessionId),
    #[error("no documents uploaded")]
    NoDocuments,
    #[error("no text content could be extracted from the uploaded documents")]
    EmptyCorpus,
    #[error("an API key is required for provider '{0}'")]
    MissingCredential(Provider),
    #[error("no processed documents; upload and process documents first")]
    NoContent,
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("documents were replaced while the question was being answered")]
    Superseded,
    #[error("{0}")]
    Backend(AnswerError),
}

impl From<AnswerError> for SessionError {
    fn from(e: AnswerError) -> Self {
        match e {
            AnswerError::NoContent => SessionError::NoContent,
            AnswerError::MissingCredential(p) => SessionError::MissingCredential(p),
            other => SessionError::Backend(other),
        }
    }
}
