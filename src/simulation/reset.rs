use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::config::SimulationConfig;

// Size of the disk below the lower pole where particles are reborn
const RESPAWN_DISK_RADIUS: f32 = 0.5;
const RESPAWN_DEPTH: f32 = 0.5;

/// Decides when a particle has left the valid shell and where it re-enters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetPolicy {
    inner_sq: f32,
    outer_sq: f32,
    pole_z: f32,
}

impl ResetPolicy {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            inner_sq: config.inner_bound() * config.inner_bound(),
            outer_sq: config.outer_bound() * config.outer_bound(),
            pole_z: config.half_height(),
        }
    }

    /// True when the particle escaped the outer sphere, got too close to the
    /// pole singularity, or holds a non-finite coordinate.
    pub fn should_reset(&self, position: Vec3) -> bool {
        if !position.is_finite() {
            return true;
        }
        let dist_sq = position.length_squared();
        dist_sq > self.outer_sq || dist_sq < self.inner_sq
    }

    /// New position in a small disk just below the lower pole, independent of
    /// how the particle was lost.
    pub fn reinitialize<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let angle = rng.gen_range(0.0..TAU);
        let radius = rng.gen_range(0.0..RESPAWN_DISK_RADIUS);
        let z = -self.pole_z - rng.gen_range(0.0..RESPAWN_DEPTH);
        Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
    }
}
