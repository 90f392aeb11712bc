use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::db;
use crate::state::SharedState;

const INTERVAL: Duration = Duration::from_secs(300);

/// Periodically drop stale login-limiter entries and expired refresh tokens.
/// Stops when `shutdown` flips to true.
pub fn spawn(state: SharedState, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Housekeeping started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            run_once(&state).await;

            tokio::select! {
                _ = tokio::time::sleep(INTERVAL) => {}
                _ = shutdown.changed() => {}
            }
        }

        tracing::debug!("Housekeeping stopped");
    })
}

async fn run_once(state: &SharedState) {
    state.login_limiter.cleanup();

    match db::refresh_tokens::purge_expired(&state.pool).await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Purged {n} expired refresh tokens"),
        Err(e) => tracing::error!("Failed to purge refresh tokens: {e}"),
    }
}
