use crate::app::AppState;
use crate::protocol::ServerMessage;
use std::sync::Arc;
use std::time::Duration;

/// Spawn a background task that moves from PLAYING to VOTING once the
/// discussion timer runs out
pub fn spawn_discussion_timer_watcher(state: Arc<AppState>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;
            check_discussion_timer(&state).await;
        }
    });
}

/// One tick of the watcher. Returns whether the phase changed.
pub async fn check_discussion_timer(state: &AppState) -> bool {
    let mut session = state.session.lock().await;
    if !session.expire_discussion(chrono::Utc::now()) {
        return false;
    }

    state.broadcast_to_all(ServerMessage::State {
        state: session.snapshot(),
    });
    true
}
