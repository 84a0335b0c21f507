pub mod context;
pub mod engine;
pub mod extractive;
pub mod generative;
pub mod lexical;
pub mod prompt;
pub mod provider;
pub mod providers;

pub use context::ContextPolicy;
pub use engine::{build_engine, AnswerEngine, AnswerError, EngineSettings};
pub use extractive::{HuggingFaceQa, LexicalExtractor};
pub use generative::GenerativeEngine;
pub use provider::{LlmError, LlmProvider, Message, Role};
