//! Periodic tasks that run alongside the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::state::AppState;

/// Evict idle sessions on a fixed period. Returns `None` when the idle
/// timeout is disabled.
pub fn spawn_session_sweeper(state: Arc<AppState>) -> Option<JoinHandle<()>> {
    let max_idle = state.config.server.session_idle_timeout()?;
    let period = (max_idle / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
    info!(idle_secs = max_idle.as_secs(), period_secs = period.as_secs(), "session sweeper started");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = state.sessions.evict_idle(max_idle).await;
            if evicted > 0 {
                let remaining = state.sessions.len().await;
                info!(evicted, remaining, "idle sessions evicted");
            }
        }
    }))
}
