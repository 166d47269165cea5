//! Lifecycle events
//!
//! The simulation never calls into rendering or audio. It queues what
//! happened during a tick and the collaborator drains the queue afterwards.
//! Sending is a push onto a `Vec`, so it cannot block or fail the tick.

use serde::{Deserialize, Serialize};

use super::bodies::{BodyId, BodyKind};

/// Why a body left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Scrolled above the visible area
    ScrolledOff,
    /// A hazard that went off
    Triggered,
    /// Cleared by a bomb blast
    Blasted,
    /// Picked up by the player
    Collected,
    /// Finished its own lifecycle
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: BodyId, kind: BodyKind },
    Removed { id: BodyId, kind: BodyKind, cause: RemovalCause },
    Jumped,
    BombExploded { id: BodyId },
    /// Run is over; `by` is the hazard that killed the player
    PlayerDied { by: BodyId },
    SectionStreamed { name: String, rows: usize },
}

/// A queue for events of a single type.
/// Events are collected during the tick and drained by the collaborator.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Take every queued event, leaving the queue empty
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
