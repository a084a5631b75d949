use crate::protocol::ServerMessage;
use crate::state::Session;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Shared host state: the single session plus the channel every connected
/// UI listens on
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: Arc::new(Mutex::new(session)),
            broadcast: tx,
        }
    }

    /// Send to every connected client
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.broadcast.send(msg);
    }
}
