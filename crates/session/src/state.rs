//! Per-session state. One instance per user session, never shared.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use docchat_core::{Config, Personality, Provider};
use docchat_ingest::AnalyticsToggles;
use docchat_llm::{AnswerEngine, EngineSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::ConversationLog;
use crate::SessionId;

pub struct SessionState {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    /// Answer engine built by the last successful ingestion.
    pub conversation: Option<Arc<dyn AnswerEngine>>,
    pub chat_history: ConversationLog,
    pub toggles: AnalyticsToggles,
    pub pdf_processed: bool,
    pub pdf_content: String,
    pub provider: Provider,
    /// Keys entered for this session, by provider. Blank means unset.
    api_keys: HashMap<Provider, String>,
    pub personality: Personality,
    pub temperature: f32,
    /// Last question that has not been answered yet.
    pub pending_question: Option<String>,
    /// Bumped by every ingestion attempt; answers computed against an
    /// older corpus are discarded.
    pub(crate) ingest_generation: u64,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("id", &self.id)
            .field("provider", &self.provider)
            .field("pdf_processed", &self.pdf_processed)
            .field("corpus_chars", &self.pdf_content.len())
            .field("turns", &self.chat_history.len())
            .finish_non_exhaustive()
    }
}

impl SessionState {
    pub fn new(id: SessionId, config: &Config) -> Self {
        let api_keys = Provider::ALL
            .into_iter()
            .filter(Provider::requires_api_key)
            .map(|p| (p, String::new()))
            .collect();
        Self {
            id,
            created_at: Utc::now(),
            conversation: None,
            chat_history: ConversationLog::new(),
            toggles: AnalyticsToggles::default(),
            pdf_processed: false,
            pdf_content: String::new(),
            provider: config.llm.provider,
            api_keys,
            personality: config.qa.personality,
            temperature: config.llm.temperature.clamp(0.0, 1.0),
            pending_question: None,
            ingest_generation: 0,
        }
    }

    /// Start-of-ingestion reset: drops the engine, the history and any
    /// pending question. Settings, toggles and keys survive.
    pub fn reset(&mut self) {
        self.ingest_generation += 1;
        self.conversation = None;
        self.chat_history.clear();
        self.pending_question = None;
    }

    /// Blank every stored API key.
    pub fn clear_secrets(&mut self) {
        for key in self.api_keys.values_mut() {
            key.clear();
        }
    }

    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.api_keys
            .get(&provider)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    /// Store a key for a provider that takes one. Returns false otherwise.
    pub fn set_api_key(&mut self, provider: Provider, key: &str) -> bool {
        match self.api_keys.get_mut(&provider) {
            Some(slot) => {
                *slot = key.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            provider: self.provider,
            api_key: self.api_key(self.provider).map(str::to_string),
            personality: self.personality,
            temperature: self.temperature,
        }
    }

    /// Apply a partial settings change. The engine is rebuilt on the next
    /// ingestion, not here.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(provider) = update.provider {
            self.provider = provider;
        }
        if let Some(key) = update.api_key.as_deref() {
            if !self.set_api_key(self.provider, key) {
                debug!(provider = %self.provider, "provider takes no API key, ignoring");
            }
        }
        if let Some(personality) = update.personality {
            self.personality = personality;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature.clamp(0.0, 1.0);
        }
        if let Some(v) = update.analytics_enabled {
            self.toggles.enabled = v;
        }
        if let Some(v) = update.display_char_count {
            self.toggles.char_count = v;
        }
        if let Some(v) = update.display_word_count {
            self.toggles.word_count = v;
        }
        if let Some(v) = update.display_sentiment {
            self.toggles.sentiment = v;
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            provider: self.provider,
            personality: self.personality,
            temperature: self.temperature,
            api_key_set: self
                .api_keys
                .keys()
                .map(|p| (p.as_str().to_string(), self.api_key(*p).is_some()))
                .collect(),
            analytics_enabled: self.toggles.enabled,
            display_char_count: self.toggles.char_count,
            display_word_count: self.toggles.word_count,
            display_sentiment: self.toggles.sentiment,
            pdf_processed: self.pdf_processed,
            corpus_chars: self.pdf_content.chars().count(),
            engine: self.conversation.as_ref().map(|e| e.provider()),
            turns: self.chat_history.len(),
            pending_question: self.pending_question.clone(),
        }
    }
}

/// Partial settings change; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub provider: Option<Provider>,
    /// Stored for the provider selected after this update.
    pub api_key: Option<String>,
    pub personality: Option<Personality>,
    pub temperature: Option<f32>,
    pub analytics_enabled: Option<bool>,
    pub display_char_count: Option<bool>,
    pub display_word_count: Option<bool>,
    pub display_sentiment: Option<bool>,
}

/// Session snapshot safe to return to clients: keys are reported only as set/unset.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub provider: Provider,
    pub personality: Personality,
    pub temperature: f32,
    pub api_key_set: BTreeMap<String, bool>,
    pub analytics_enabled: bool,
    pub display_char_count: bool,
    pub display_word_count: bool,
    pub display_sentiment: bool,
    pub pdf_processed: bool,
    pub corpus_chars: usize,
    /// Provider of the engine built at the last ingestion.
    pub engine: Option<Provider>,
    pub turns: usize,
    pub pending_question: Option<String>,
}
