//! Player lifecycle events.
//!
//! Players push events onto their own queue as they change state. Hosts poll
//! the queue after ticking:
//!
//! ```ignore
//! player.tick();
//! for event in player.drain_events() {
//!     if let PlayerEvent::Finished { player_id } = event {
//!         println!("{} finished", player_id);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::PlayerId;

/// Event emitted when a player changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Playback started and initial values were captured.
    Started { player_id: PlayerId },
    /// The timeline reached its end.
    Finished { player_id: PlayerId },
    /// Playback was cancelled before the end.
    Cancelled { player_id: PlayerId },
}

impl PlayerEvent {
    /// Get the player ID for this event.
    pub fn player_id(&self) -> PlayerId {
        match self {
            Self::Started { player_id }
            | Self::Finished { player_id }
            | Self::Cancelled { player_id } => *player_id,
        }
    }
}

/// FIFO queue of player events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PlayerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlayerEvent) {
        self.events.push_back(event);
    }

    /// Remove and return all queued events, oldest first.
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
