use std::env;

use serde::{Deserialize, Serialize};

use crate::options::{ContextPolicyKind, Personality, Provider};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an enum-valued env var, warning and falling back on garbage.
fn profiled_env_parse<T>(profile: &str, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("{}: {}, using default", key, e);
            default
        }),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

/// `Default` is the built-in configuration with no environment applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub qa: QaConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DOCCHAT_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("DOCCHAT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            qa: QaConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:  {}:{} (upload limit {} MB, session idle {}s)", self.server.host, self.server.port, self.server.max_upload_mb, self.server.session_idle_secs);
        tracing::info!("  llm:     provider={}, configured={}", self.llm.provider, self.llm.is_configured());
        tracing::info!("  ollama:  url={}, model={}", self.ollama.url, self.ollama.model);
        tracing::info!("  qa:      policy={:?}, max_context_chars={}", self.qa.context_policy, self.qa.max_context_chars);
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": {
                "host": self.server.host,
                "port": self.server.port,
                "max_upload_mb": self.server.max_upload_mb,
                "session_idle_secs": self.server.session_idle_secs,
            },
            "llm": {
                "provider": self.llm.provider,
                "configured": self.llm.is_configured(),
                "openai_model": self.llm.openai_model,
                "cohere_model": self.llm.cohere_model,
                "huggingface_qa_model": self.llm.huggingface_qa_model,
                "temperature": self.llm.temperature,
                "max_tokens": self.llm.max_tokens,
            },
            "ollama": { "url": self.ollama.url, "model": self.ollama.model },
            "qa": {
                "context_policy": self.qa.context_policy,
                "max_context_chars": self.qa.max_context_chars,
                "window_tokens": self.qa.window_tokens,
                "window_overlap_tokens": self.qa.window_overlap_tokens,
                "personality": self.qa.personality,
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    /// Request body cap for uploads, in megabytes.
    pub max_upload_mb: u32,
    /// Sessions untouched for this long are dropped. 0 keeps them forever.
    pub session_idle_secs: u64,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 3001),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_u32(p, "MAX_UPLOAD_MB", 200),
            session_idle_secs: profiled_env_u64(p, "SESSION_IDLE_SECS", 3600),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }

    pub fn session_idle_timeout(&self) -> Option<std::time::Duration> {
        (self.session_idle_secs > 0).then(|| std::time::Duration::from_secs(self.session_idle_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            cors_origin: "*".into(),
            max_upload_mb: 200,
            session_idle_secs: 3600,
        }
    }
}

// ── LLM (OpenAI / Cohere / Hugging Face) ──────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Default provider for new sessions.
    pub provider: Provider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub cohere_api_key: Option<String>,
    pub cohere_model: String,
    pub cohere_base_url: String,
    pub huggingface_api_key: Option<String>,
    pub huggingface_qa_model: String,
    pub huggingface_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_parse(p, "LLM_PROVIDER", Provider::Extractive),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_or(p, "OPENAI_BASE_URL", "https://api.openai.com"),
            cohere_api_key: profiled_env_opt(p, "COHERE_API_KEY"),
            cohere_model: profiled_env_or(p, "COHERE_MODEL", "command-r"),
            cohere_base_url: profiled_env_or(p, "COHERE_BASE_URL", "https://api.cohere.ai"),
            huggingface_api_key: profiled_env_opt(p, "HUGGINGFACEHUB_API_TOKEN"),
            huggingface_qa_model: profiled_env_or(
                p,
                "HUGGINGFACE_QA_MODEL",
                "distilbert-base-uncased-distilled-squad",
            ),
            huggingface_base_url: profiled_env_or(
                p,
                "HUGGINGFACE_BASE_URL",
                "https://api-inference.huggingface.co",
            ),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.5")
                .parse::<f32>()
                .unwrap_or(0.5)
                .clamp(0.0, 1.0),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 1024),
        }
    }

    /// Server-wide key for a provider, used when a session supplies none.
    pub fn api_key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Cohere => self.cohere_api_key.as_deref(),
            Provider::HuggingFace => self.huggingface_api_key.as_deref(),
            Provider::Extractive | Provider::Ollama => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.provider.requires_api_key() || self.api_key_for(self.provider).is_some()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Extractive,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".into(),
            openai_base_url: "https://api.openai.com".into(),
            cohere_api_key: None,
            cohere_model: "command-r".into(),
            cohere_base_url: "https://api.cohere.ai".into(),
            huggingface_api_key: None,
            huggingface_qa_model: "distilbert-base-uncased-distilled-squad".into(),
            huggingface_base_url: "https://api-inference.huggingface.co".into(),
            temperature: 0.5,
            max_tokens: 1024,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
        }
    }
}

// ── Question answering ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    pub context_policy: ContextPolicyKind,
    /// Character budget for the context sent to a backend.
    pub max_context_chars: usize,
    /// Window size in whitespace tokens for the `window` policy.
    pub window_tokens: usize,
    pub window_overlap_tokens: usize,
    /// Default personality for new sessions.
    pub personality: Personality,
}

impl QaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            context_policy: profiled_env_parse(p, "QA_CONTEXT_POLICY", ContextPolicyKind::Truncate),
            max_context_chars: profiled_env_usize(p, "QA_MAX_CONTEXT_CHARS", 12_000),
            window_tokens: profiled_env_usize(p, "QA_WINDOW_TOKENS", 200),
            window_overlap_tokens: profiled_env_usize(p, "QA_WINDOW_OVERLAP", 20),
            personality: profiled_env_parse(p, "QA_PERSONALITY", Personality::GeneralAssistant),
        }
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            context_policy: ContextPolicyKind::Truncate,
            max_context_chars: 12_000,
            window_tokens: 200,
            window_overlap_tokens: 20,
            personality: Personality::GeneralAssistant,
        }
    }
}
