use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Abstract input actions consumed by the simulation. The host input
/// collaborator maps devices (keys, touch buttons) onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
    Respawn,
}

/// Per-tick input snapshot. The host feeds press/release edges as they
/// arrive; the simulation reads held state and one-tick edges. Edge
/// queries are valid until `end_frame` clears them at the end of the tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    down: HashSet<Action>,
    pressed: HashSet<Action>,
    released: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press edge. Auto-repeat is filtered: an action already
    /// held does not produce another press edge.
    pub fn press(&mut self, action: Action) {
        if self.down.insert(action) {
            self.pressed.insert(action);
        }
    }

    /// Register a release edge.
    pub fn release(&mut self, action: Action) {
        self.down.remove(&action);
        self.released.insert(action);
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.down.contains(&action)
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn was_released(&self, action: Action) -> bool {
        self.released.contains(&action)
    }

    /// Clear the one-tick edge sets. Held state persists.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Drop all state, edges and held alike. The host calls this on focus
    /// loss so no action stays stuck down.
    pub fn clear_all(&mut self) {
        self.down.clear();
        self.pressed.clear();
        self.released.clear();
    }
}
