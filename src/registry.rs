//! Roster of joined players
//!
//! A single mutex guards the roster. Broadcasts copy the roster under the
//! lock and deliver after releasing it, so a dead socket never blocks joins
//! or leaves, and one failed delivery never stops the rest.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::message::ServerMessage;
use crate::player::Player;
use crate::types::PlayerId;

/// Thread-safe player roster
#[derive(Debug, Default)]
pub struct Registry {
    players: Mutex<Vec<Player>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Player>> {
        // A panic while holding the lock cannot leave the Vec half-updated.
        self.players.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a player to the roster
    ///
    /// The returned guard removes the player again when dropped.
    pub fn register(self: &Arc<Self>, player: Player) -> Registration {
        let id = player.id;
        let total = {
            let mut players = self.lock();
            players.push(player);
            players.len()
        };
        debug!("Player {} registered, total players: {}", id, total);

        Registration {
            registry: Arc::clone(self),
            id,
        }
    }

    /// Remove a player from the roster
    ///
    /// Returns the removed player, or None if they were not registered.
    pub fn deregister(&self, id: PlayerId) -> Option<Player> {
        let mut players = self.lock();
        let index = players.iter().position(|p| p.id == id)?;
        let player = players.remove(index);
        debug!("Player {} deregistered, total players: {}", id, players.len());
        Some(player)
    }

    /// Copy of the roster in join order
    pub fn snapshot(&self) -> Vec<Player> {
        self.lock().clone()
    }

    /// Display names in join order
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Deliver a message to every registered player
    ///
    /// Returns how many players accepted it. Failures are logged and skipped.
    pub fn broadcast(&self, msg: &ServerMessage) -> usize {
        let players = self.snapshot();
        let mut delivered = 0;

        for player in &players {
            match player.send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Dropping '{}' for {} ({}): {}", msg, player.name, player.id, e),
            }
        }

        delivered
    }
}

/// Roster membership that ends when dropped
///
/// Ties deregistration to the connection's scope, so it runs exactly once
/// however the connection loop exits.
#[derive(Debug)]
pub struct Registration {
    registry: Arc<Registry>,
    id: PlayerId,
}

impl Registration {
    pub fn id(&self) -> PlayerId {
        self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}
