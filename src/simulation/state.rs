use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::simulation::reset::ResetPolicy;

/// Fixed-size array of particle positions. The index is the particle's identity.
#[derive(Debug, Clone, Default)]
pub struct ParticleState {
    positions: Vec<Vec3>,
}

impl ParticleState {
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// Scatter `count` particles uniformly inside a sphere of `radius`.
    /// Positions the reset policy would reject are reinitialized right away.
    pub fn scatter<R: Rng + ?Sized>(count: usize, radius: f32, policy: &ResetPolicy, rng: &mut R) -> Self {
        let positions = (0..count)
            .map(|_| {
                let p = random_in_sphere(radius, rng);
                if policy.should_reset(p) { policy.reinitialize(rng) } else { p }
            })
            .collect();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// Overwrite one position. Returns `false` when `index` is out of range.
    pub fn set(&mut self, index: usize, position: Vec3) -> bool {
        match self.positions.get_mut(index) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.positions
    }
}

// Cube root of the radius sample keeps the density uniform in volume
fn random_in_sphere<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec3 {
    let r = rng.gen_range(0.0f32..1.0).cbrt() * radius;
    let theta = rng.gen_range(0.0..TAU);
    let phi = rng.gen_range(-1.0f32..1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}
