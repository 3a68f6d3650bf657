//! Core player types.
//!
//! - `PlayerId`: unique identifier for a player instance
//! - `PlayState`: lifecycle state of a player
//! - `FillMode`: what happens to styles outside the active interval

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a player instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Generate a new unique player ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Lifecycle state of a player.
///
/// ```text
/// Idle ──play──▶ Playing ──elapsed ≥ duration──▶ Finished
///                   │
///                   └──────cancel──────────────▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    /// Created but not yet played.
    #[default]
    Idle,
    /// Waiting for ticks.
    Playing,
    /// Reached the end of its duration.
    Finished,
    /// Stopped externally before the end.
    Cancelled,
}

/// What values to apply before/after the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Restore the pre-animation values once finished.
    #[default]
    None,
    /// Retain the final keyframe values after the animation ends.
    Forwards,
    /// Apply the first keyframe values during the delay period.
    Backwards,
    /// Apply both forwards and backwards behavior.
    Both,
}

impl FillMode {
    /// Parse a fill token (`none`, `forwards`, `backwards`, `both`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "none" => Some(Self::None),
            "forwards" => Some(Self::Forwards),
            "backwards" => Some(Self::Backwards),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Should apply values before animation starts (during delay)?
    pub fn applies_backwards(&self) -> bool {
        matches!(self, Self::Backwards | Self::Both)
    }

    /// Should retain values after animation ends?
    pub fn applies_forwards(&self) -> bool {
        matches!(self, Self::Forwards | Self::Both)
    }
}
