//! Action kinds and the busy timer

use serde::{Deserialize, Serialize};

/// Longest an action may keep a creature busy, in ticks
pub const MAX_ACTION: u32 = 100;

/// What a creature did on its last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionKind {
    #[default]
    Idle,
    Reproduce,
    Eat,
    Move,
    Wander,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Idle => "idle",
            ActionKind::Reproduce => "reproduce",
            ActionKind::Eat => "eat",
            ActionKind::Move => "move",
            ActionKind::Wander => "wander",
        }
    }
}

/// Countdown that blocks movement while an action resolves
///
/// `done` flips to true exactly once, on the tick the countdown reaches zero,
/// and stays set until the owner consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionTimer {
    remaining: u32,
    done: bool,
}

impl ActionTimer {
    pub fn start_action(&mut self, ticks: u32) {
        if ticks == 0 {
            return;
        }
        self.remaining = ticks.min(MAX_ACTION);
        self.done = false;
    }

    /// Advance by one tick; returns true if the action just completed
    pub fn tick_action(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.done = true;
        }
        self.done
    }

    pub fn is_busy(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consume the completion flag
    pub fn take_done(&mut self) -> bool {
        std::mem::take(&mut self.done)
    }
}
