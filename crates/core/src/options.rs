use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Answer backend selectable per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Hosted chat completion (OpenAI-compatible `/v1/chat/completions`).
    OpenAi,
    /// Hosted chat completion (Cohere `/v1/chat`).
    Cohere,
    /// Hosted extractive question answering (Hugging Face Inference API).
    HuggingFace,
    /// Local lexical span extraction, no network.
    #[default]
    Extractive,
    /// Local text generation through an Ollama server.
    Ollama,
}

/// The three answer strategies a provider can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    HostedChat,
    ExtractiveQa,
    LocalGeneration,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::OpenAi,
        Provider::Cohere,
        Provider::HuggingFace,
        Provider::Extractive,
        Provider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Cohere => "cohere",
            Provider::HuggingFace => "huggingface",
            Provider::Extractive => "extractive",
            Provider::Ollama => "ollama",
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Provider::OpenAi | Provider::Cohere => BackendKind::HostedChat,
            Provider::HuggingFace | Provider::Extractive => BackendKind::ExtractiveQa,
            Provider::Ollama => BackendKind::LocalGeneration,
        }
    }

    /// Whether an API key must be present before an engine can be built.
    pub fn requires_api_key(&self) -> bool {
        matches!(
            self,
            Provider::OpenAi | Provider::Cohere | Provider::HuggingFace
        )
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "cohere" => Ok(Provider::Cohere),
            "huggingface" | "hf" => Ok(Provider::HuggingFace),
            "extractive" | "extractive-qa" => Ok(Provider::Extractive),
            "ollama" | "local" | "local-generation" => Ok(Provider::Ollama),
            other => Err(CoreError::UnknownProvider(other.to_string())),
        }
    }
}

/// Tone appended to the generative instruction. Cosmetic for extractive backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Personality {
    #[default]
    GeneralAssistant,
    Academic,
    Witty,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::GeneralAssistant => "general assistant",
            Personality::Academic => "academic",
            Personality::Witty => "witty",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Personality::GeneralAssistant => {
                "Answer as a helpful general assistant: clear, direct and friendly."
            }
            Personality::Academic => {
                "Answer in an academic register: precise, structured and cautious about claims the context does not support."
            }
            Personality::Witty => {
                "Answer with a light, witty tone while staying accurate to the context."
            }
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "general assistant" | "general" => Ok(Personality::GeneralAssistant),
            "academic" => Ok(Personality::Academic),
            "witty" => Ok(Personality::Witty),
            _ => Err(CoreError::UnknownPersonality(s.to_string())),
        }
    }
}

/// How an oversized corpus is cut down before it is sent to a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextPolicyKind {
    /// Keep the leading `max_context_chars` characters.
    #[default]
    Truncate,
    /// Keep the windows that best match the question, up to the same budget.
    Window,
}

impl FromStr for ContextPolicyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(ContextPolicyKind::Truncate),
            "window" | "windows" => Ok(ContextPolicyKind::Window),
            other => Err(CoreError::UnknownContextPolicy(other.to_string())),
        }
    }
}
