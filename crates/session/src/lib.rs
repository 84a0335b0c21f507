//! Per-session state, conversation history and the ingest/ask pipeline.

pub mod conversation;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod store;

pub use conversation::{ConversationLog, RenderOrder, Turn, TurnRole};
pub use error::SessionError;
pub use pipeline::{
    ask, begin_ingest, complete_ask, finish_ingest, ingest, prepare_ask, AskOutcome, IngestOutcome,
    PendingAsk,
};
pub use state::{SessionState, SessionView, SettingsUpdate};
pub use store::{SessionStore, SharedSession};

pub type SessionId = uuid::Uuid;
