use std::sync::Arc;

use chrono::{DateTime, Utc};
use docchat_core::Config;
use docchat_session::SessionStore;

pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            sessions: SessionStore::new(config.clone()),
            config,
            started_at: Utc::now(),
        }
    }
}
