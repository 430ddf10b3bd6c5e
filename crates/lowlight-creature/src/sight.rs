//! Sight geometry: a circular sector plus a hitbox ellipse
//!
//! This module only answers geometric questions. Whether a visible point is
//! also reachable is decided by the world.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Hitbox semi-axis of a size 1 creature, in pixels
pub const HITBOX_RADIUS: f32 = 16.0;

/// Tolerance under which a sector is treated as an exact half-plane
const HALF_PLANE_EPSILON: f32 = 0.01;

/// Snapshot of a creature's sight at one position and heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sight {
    pub origin: Vec2,
    /// Facing angle in radians
    pub facing: f32,
    pub radius: f32,
    /// Full opening angle in radians
    pub angle: f32,
    /// Semi-axes of the hitbox ellipse
    pub hitbox: Vec2,
}

impl Sight {
    pub fn new(origin: Vec2, facing: f32, radius: f32, angle: f32, size: f32) -> Self {
        Self {
            origin,
            facing,
            radius,
            angle,
            hitbox: Vec2::splat(HITBOX_RADIUS * size),
        }
    }

    pub fn in_hitbox(&self, point: Vec2) -> bool {
        if self.hitbox.x <= 0.0 || self.hitbox.y <= 0.0 {
            return false;
        }
        let d = (point - self.origin) / self.hitbox;
        d.length_squared() <= 1.0
    }

    /// Inside the sight circle and within the opening angle
    pub fn in_sector(&self, point: Vec2) -> bool {
        let offset = point - self.origin;
        if offset.length_squared() > self.radius * self.radius {
            return false;
        }
        if self.angle >= TAU {
            return true;
        }
        if (PI - self.angle).abs() < HALF_PLANE_EPSILON {
            return offset.dot(Vec2::from_angle(self.facing)) >= 0.0;
        }
        angle_between(offset.y.atan2(offset.x), self.facing) <= self.angle / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.in_hitbox(point) || self.in_sector(point)
    }
}

/// Absolute angular difference wrapped to `[0, π]`
pub fn angle_between(a: f32, b: f32) -> f32 {
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}
