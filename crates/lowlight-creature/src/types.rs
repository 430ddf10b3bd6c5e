//! Common types shared by every entity kind

use serde::{Deserialize, Serialize};

/// Handle to an entity in the registry
///
/// Ids are allocated by the registry in increasing order and never reused, so
/// ordering by id is ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Get the raw u64 value (useful for debugging/serialization)
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn from_raw(id: u64) -> Self {
        EntityId(id)
    }

    /// Id following this one
    pub fn next(&self) -> Self {
        EntityId(self.0 + 1)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn opposite(self) -> Self {
        match self {
            Gender::Female => Gender::Male,
            Gender::Male => Gender::Female,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Gender::Female => 'f',
            Gender::Male => 'm',
        }
    }
}

/// Health meter, always within `0..=max`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    /// Create a new full health meter
    pub fn new(max: f32) -> Self {
        Health { current: max, max }
    }

    pub fn heal(&mut self, amount: f32) {
        self.set(self.current + amount);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Get health as a fraction (0.0 - 1.0)
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    /// Set current health (clamped to 0..=max)
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    /// Change the ceiling, pulling current health down if needed
    pub fn set_max(&mut self, new_max: f32) {
        self.max = new_max.max(0.0);
        self.current = self.current.clamp(0.0, self.max);
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Satiety meter; zero means starving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hunger {
    pub current: f32,
    pub max: f32,
}

impl Hunger {
    pub fn new(max: f32) -> Self {
        Hunger { current: max, max }
    }

    /// Eat food to restore hunger
    pub fn eat(&mut self, amount: f32) {
        self.set(self.current + amount);
    }

    pub fn is_starving(&self) -> bool {
        self.current <= 0.0
    }

    /// How much is missing to be full
    pub fn deficit(&self) -> f32 {
        (self.max - self.current).max(0.0)
    }

    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    /// Set current hunger (clamped to 0..=max)
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }
}
