pub mod config;
pub mod document;
pub mod error;
pub mod options;

pub use config::Config;
pub use document::*;
pub use error::*;
pub use options::*;
