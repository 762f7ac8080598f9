use std::time::Duration;

use crate::state::AppState;

/// Spawn a background task that periodically evicts idle checkout and
/// onboarding sessions.
///
/// Runs every `config.session_sweep_interval_secs` and drops sessions unseen
/// for `config.session_idle_timeout_secs`. The returned `JoinHandle` is
/// aborted during shutdown.
pub fn start_session_sweeper(state: AppState) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.session_sweep_interval_secs.max(1));
    let max_idle = Duration::from_secs(state.config.session_idle_timeout_secs);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            let evicted = sweep_idle_sessions(&state, max_idle).await;
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle sessions");
            } else {
                tracing::debug!("Session sweep found nothing idle");
            }
        }
    })
}

/// Evict idle sessions from every store once. Returns the number evicted.
pub async fn sweep_idle_sessions(state: &AppState, max_idle: Duration) -> usize {
    state.checkouts.evict_idle(max_idle).await + state.onboarding.evict_idle(max_idle).await
}
