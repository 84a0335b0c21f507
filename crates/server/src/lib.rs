//! HTTP API and command-line front end for docchat.

pub mod api;
pub mod background;
pub mod cli;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
