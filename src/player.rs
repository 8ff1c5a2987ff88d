//! Player struct definition
//!
//! Represents a joined player with their card and outbound message queue.

use tokio::sync::mpsc;

use crate::card::Card;
use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::PlayerId;

/// Slots in each player's outbound queue
///
/// A whole session is at most one card, 75 balls and a handful of verdicts,
/// so a player who is reading at all never fills it.
pub const OUTBOUND_BUFFER: usize = 128;

/// Joined player information
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier for this connection
    pub id: PlayerId,
    /// Display name from the handshake
    pub name: String,
    /// Card issued at join time
    pub card: Card,
    /// Server → Player message queue, drained by the connection's writer
    pub sender: mpsc::Sender<ServerMessage>,
}

impl Player {
    /// Create a new player with a fresh ID
    pub fn new(name: String, card: Card, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id: PlayerId::new(),
            name,
            card,
            sender,
        }
    }

    /// Queue a message for this player without waiting
    ///
    /// Returns an error if the writer is gone or the queue is full.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}
