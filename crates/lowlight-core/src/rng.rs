//! Seeded randomness for the whole simulation
//!
//! Two independent xoshiro streams are derived from one seed: a uniform
//! stream for behavior and placement, and a death stream feeding the reaper.
//! Keeping them apart means mortality draws never shift behavior draws.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Rate of the exponential distribution used by the reaper
pub const REAPER_LAMBDA: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct LifeRng {
    uniform: Xoshiro256StarStar,
    death: Xoshiro256StarStar,
}

impl LifeRng {
    pub fn new(seed: u64) -> Self {
        let uniform = Xoshiro256StarStar::seed_from_u64(seed);
        let mut death = uniform.clone();
        death.jump();
        Self { uniform, death }
    }

    /// Uniform float in `[min, max)`
    pub fn random(&mut self, min: f32, max: f32) -> f32 {
        let u: f32 = self.uniform.r#gen();
        min + u * (max - min)
    }

    /// Uniform integer in `[min, max)`
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.uniform.gen_range(min..max)
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.random(0.0, 1.0) < probability
    }

    /// Random angle in `[0, 2π)`
    pub fn angle(&mut self) -> f32 {
        self.random(0.0, std::f32::consts::TAU)
    }

    /// Stochastic mortality check
    ///
    /// Draws an exponential sample and reports death when it exceeds
    /// `longevity / age`. Newborns and immortal genes never die this way.
    pub fn reaper(&mut self, age: u64, longevity: f32) -> bool {
        let u: f64 = self.death.r#gen();
        let sample = -(1.0 - u).ln() / REAPER_LAMBDA;
        if age == 0 || longevity.is_infinite() {
            return false;
        }
        sample > f64::from(longevity) / age as f64
    }
}
