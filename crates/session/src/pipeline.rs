//! Ingestion and question answering over one session.

use std::sync::Arc;

use docchat_core::{Config, Provider, UploadedDocument};
use docchat_ingest::{AnalyticsReport, CorpusBuild, CorpusBuilder, DocumentFailure, TextExtractor};
use docchat_llm::{build_engine, engine::check_credentials, AnswerEngine, AnswerError, EngineSettings};
use serde::Serialize;
use tracing::{info, warn};

use crate::conversation::Turn;
use crate::error::SessionError;
use crate::state::SessionState;

/// Result of a successful ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub provider: Provider,
    /// Documents whose text made it into the corpus, in upload order.
    pub documents: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<DocumentFailure>,
    pub corpus_chars: usize,
    pub analytics: AnalyticsReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub provider: Provider,
    pub answer: String,
    /// The exchange just recorded: user turn, then bot turn.
    pub exchange: Vec<Turn>,
}

/// First half of an ingestion: validates the batch and credentials, then
/// resets the session. An empty batch only marks the session unprocessed;
/// a missing credential mutates nothing.
pub fn begin_ingest(
    state: &mut SessionState,
    document_count: usize,
    config: &Config,
) -> Result<EngineSettings, SessionError> {
    if document_count == 0 {
        state.pdf_processed = false;
        return Err(SessionError::NoDocuments);
    }
    let settings = state.settings();
    check_credentials(&settings, config)?;

    state.reset();
    state.pdf_processed = false;
    state.pdf_content.clear();
    Ok(settings)
}

/// Second half: install the corpus and engine, then build analytics.
/// An empty corpus leaves the session in its reset state.
pub fn finish_ingest(
    state: &mut SessionState,
    build: CorpusBuild,
    settings: &EngineSettings,
    config: &Config,
) -> Result<IngestOutcome, SessionError> {
    if build.is_empty() {
        warn!(
            session = %state.id,
            documents = build.documents.len(),
            failed = build.failures.len(),
            "no text extracted, session left unprocessed"
        );
        return Err(SessionError::EmptyCorpus);
    }

    let engine = build_engine(settings, config)?;
    let analytics = docchat_ingest::analytics::report(&build.documents, &state.toggles);

    let documents = build
        .documents
        .iter()
        .map(|d| d.name.clone())
        .filter(|name| !build.skipped.contains(name))
        .collect();

    state.pdf_content = build.corpus;
    state.conversation = Some(engine);
    state.pdf_processed = true;

    let outcome = IngestOutcome {
        provider: settings.provider,
        documents,
        skipped: build.skipped,
        failures: build.failures,
        corpus_chars: state.pdf_content.chars().count(),
        analytics,
    };
    info!(
        session = %state.id,
        provider = %outcome.provider,
        documents = outcome.documents.len(),
        corpus_chars = outcome.corpus_chars,
        "documents processed"
    );
    Ok(outcome)
}

/// Reset the session and ingest `documents` in one call. Extraction runs on
/// the calling thread.
pub fn ingest<E: TextExtractor>(
    state: &mut SessionState,
    documents: &[UploadedDocument],
    builder: &CorpusBuilder<E>,
    config: &Config,
) -> Result<IngestOutcome, SessionError> {
    let settings = begin_ingest(state, documents.len(), config)?;
    let build = builder.build(documents);
    finish_ingest(state, build, &settings, config)
}

/// A question accepted for answering. Holds everything the backend call
/// needs, so the session lock can be released while it runs.
pub struct PendingAsk {
    engine: Arc<dyn AnswerEngine>,
    corpus: String,
    question: String,
    generation: u64,
}

impl PendingAsk {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub async fn run(&self) -> Result<String, AnswerError> {
        self.engine.answer(&self.corpus, &self.question).await
    }
}

/// Validate `question` and mark it pending. No backend call is made.
pub fn prepare_ask(state: &mut SessionState, question: &str) -> Result<PendingAsk, SessionError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(SessionError::EmptyQuestion);
    }
    if !state.pdf_processed || state.pdf_content.trim().is_empty() {
        return Err(SessionError::NoContent);
    }
    let engine = state.conversation.clone().ok_or(SessionError::NoContent)?;

    state.pending_question = Some(question.to_string());
    Ok(PendingAsk {
        engine,
        corpus: state.pdf_content.clone(),
        question: question.to_string(),
        generation: state.ingest_generation,
    })
}

/// Record the backend's result. On failure the history is untouched and the
/// question stays pending. An answer to a corpus that has since been
/// replaced is dropped.
pub fn complete_ask(
    state: &mut SessionState,
    pending: PendingAsk,
    result: Result<String, AnswerError>,
) -> Result<AskOutcome, SessionError> {
    let provider = pending.engine.provider();
    if state.ingest_generation != pending.generation {
        warn!(session = %state.id, %provider, "documents replaced mid-question, answer dropped");
        return Err(SessionError::Superseded);
    }
    let answer = match result {
        Ok(answer) => answer,
        Err(e) => {
            warn!(session = %state.id, %provider, error = %e, "answer failed");
            return Err(e.into());
        }
    };

    state.chat_history.append_exchange(&pending.question, &answer);
    if state.pending_question.as_deref() == Some(pending.question.as_str()) {
        state.pending_question = None;
    }
    let exchange = state.chat_history.turns()[state.chat_history.len() - 2..].to_vec();
    info!(
        session = %state.id,
        %provider,
        exchanges = state.chat_history.exchanges(),
        "question answered"
    );

    Ok(AskOutcome {
        provider,
        answer,
        exchange,
    })
}

/// Answer `question` from the session corpus and record the exchange, with
/// the session held throughout.
pub async fn ask(state: &mut SessionState, question: &str) -> Result<AskOutcome, SessionError> {
    let pending = prepare_ask(state, question)?;
    let result = pending.run().await;
    complete_ask(state, pending, result)
}
