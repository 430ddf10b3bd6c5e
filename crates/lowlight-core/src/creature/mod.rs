//! Creature behavior - perception (input) and decision (output)

pub mod decision;
pub mod perception;

pub use decision::prepare;
pub use perception::{Perception, Seen};
