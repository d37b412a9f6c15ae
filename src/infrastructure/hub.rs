use crate::core::messages::ServerMessage;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

const CHANNEL_CAPACITY: usize = 64;

/// Per-session fan-out of server messages to connected clients.
#[derive(Clone, Default)]
pub struct SessionHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<ServerMessage>>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, session_code: &str) -> broadcast::Receiver<ServerMessage> {
        let mut channels = self.channels.write().await;
        channels
            .entry(session_code.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Sends to every subscriber of the session; returns how many got it.
    pub async fn publish(&self, session_code: &str, message: ServerMessage) -> usize {
        let mut channels = self.channels.write().await;
        let Some(sender) = channels.get(session_code) else {
            return 0;
        };

        match sender.send(message) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No listeners left on session {}, dropping channel", session_code);
                channels.remove(session_code);
                0
            }
        }
    }
}
