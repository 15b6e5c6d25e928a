//! First-order advection of particles along the solenoid field lines.
//!
//! No velocity survives between frames: every step re-derives the direction
//! from the field at the current position and moves the particle a fixed
//! distance `flow_speed * dt` along it (explicit Euler on the unit field).

use glam::Vec3;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::simulation::field::DipoleField;
use crate::simulation::reset::ResetPolicy;
use crate::simulation::types::{MAX_FRAME_DELTA, NEGLIGIBLE_FIELD_SQ};

/// Flow direction inside the solenoid bore.
pub const AXIAL_DIRECTION: Vec3 = Vec3::Z;

/// Clamp a frame delta supplied by the host. Non-finite or negative values
/// become zero so they never reach position state.
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

/// Result of advancing a single particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Moved along the field to the new position.
    Advanced(Vec3),
    /// Left the valid volume and was reborn at the new position.
    Reset(Vec3),
    /// Nothing changed (zero frame delta).
    Stationary,
}

impl StepOutcome {
    pub fn position_or(self, previous: Vec3) -> Vec3 {
        match self {
            StepOutcome::Advanced(p) | StepOutcome::Reset(p) => p,
            StepOutcome::Stationary => previous,
        }
    }

    pub fn changed(self) -> bool {
        !matches!(self, StepOutcome::Stationary)
    }

    pub fn is_reset(self) -> bool {
        matches!(self, StepOutcome::Reset(_))
    }
}

#[derive(Debug, Clone)]
pub struct Integrator {
    config: SimulationConfig,
    field: DipoleField,
    policy: ResetPolicy,
}

impl Integrator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            config: config.clone(),
            field: DipoleField::new(config.dipole_moment()),
            policy: ResetPolicy::new(config),
        }
    }

    pub fn policy(&self) -> &ResetPolicy {
        &self.policy
    }

    pub fn field(&self) -> &DipoleField {
        &self.field
    }

    /// Displacement for one step from `position`, ignoring the reset bounds.
    /// `None` when the exterior field is too weak to give a direction.
    pub fn displacement(&self, position: Vec3, dt: f32) -> Option<Vec3> {
        let distance = self.config.flow_speed() * clamp_frame_delta(dt);

        if self.config.is_inside_coil(position) {
            return Some(AXIAL_DIRECTION * distance);
        }

        let b = self.field.field(position);
        if b.length_squared() < NEGLIGIBLE_FIELD_SQ {
            return None;
        }
        Some(b.normalize() * distance)
    }

    /// Advance one particle. A particle outside the valid shell, in a
    /// negligible field, or displaced out of the shell is reinitialized
    /// within the same step.
    pub fn step<R: Rng + ?Sized>(&self, position: Vec3, dt: f32, rng: &mut R) -> StepOutcome {
        if self.policy.should_reset(position) {
            return StepOutcome::Reset(self.policy.reinitialize(rng));
        }

        let Some(offset) = self.displacement(position, dt) else {
            return StepOutcome::Reset(self.policy.reinitialize(rng));
        };
        if offset == Vec3::ZERO {
            return StepOutcome::Stationary;
        }

        let next = position + offset;
        if self.policy.should_reset(next) {
            StepOutcome::Reset(self.policy.reinitialize(rng))
        } else {
            StepOutcome::Advanced(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn integrator() -> Integrator {
        Integrator::new(&SimulationConfig::default())
    }

    #[test]
    fn test_clamp_frame_delta() {
        assert_eq!(clamp_frame_delta(0.01), 0.01);
        assert_eq!(clamp_frame_delta(1.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_frame_delta(-0.5), 0.0);
        assert_eq!(clamp_frame_delta(f32::NAN), 0.0);
        assert_eq!(clamp_frame_delta(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_interior_flow_at_bore_center() {
        let speed = SimulationConfig::default().flow_speed();
        let offset = integrator().displacement(Vec3::ZERO, 1.0 / 30.0).unwrap();

        assert!(offset.abs_diff_eq(Vec3::new(0.0, 0.0, speed / 30.0), 1e-6));
    }

    #[test]
    fn test_interior_step_is_axial() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = Vec3::new(0.0, 0.0, 1.0);
        let outcome = integrator().step(start, 1.0 / 30.0, &mut rng);

        let StepOutcome::Advanced(next) = outcome else {
            panic!("expected an advance, got {:?}", outcome);
        };
        let moved = next - start;
        assert!(moved.x.abs() < 1e-6 && moved.y.abs() < 1e-6);
        assert!((moved.z - 0.5 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_exterior_step_follows_field() {
        let mut rng = StdRng::seed_from_u64(2);
        let start = Vec3::new(4.0, 0.0, 0.0);
        let next = integrator().step(start, 0.02, &mut rng).position_or(start);

        let moved = next - start;
        assert!((moved.length() - 0.5 * 0.02).abs() < 1e-5);
        // Field in the equatorial plane points against the moment
        assert!(moved.z < 0.0);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Vec3::new(0.0, 0.0, 1.0);
        let next = integrator().step(start, 2.0, &mut rng).position_or(start);
        assert!((next.z - start.z - 0.5 * MAX_FRAME_DELTA).abs() < 1e-6);
    }

    #[test]
    fn test_nan_delta_leaves_position() {
        let mut rng = StdRng::seed_from_u64(4);
        let start = Vec3::new(4.0, 1.0, 2.0);
        assert_eq!(integrator().step(start, f32::NAN, &mut rng), StepOutcome::Stationary);
    }

    #[test]
    fn test_escaped_particle_resets() {
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = integrator().step(Vec3::new(20.0, 0.0, 0.0), 0.01, &mut rng);
        assert!(outcome.is_reset());
        assert!(outcome.position_or(Vec3::ZERO).z <= -2.5);
    }

    #[test]
    fn test_particle_near_pole_resets() {
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = integrator().step(Vec3::new(0.05, 0.0, 0.05), 0.01, &mut rng);
        assert!(outcome.is_reset());
    }

    #[test]
    fn test_step_across_outer_bound_resets() {
        let mut rng = StdRng::seed_from_u64(8);
        let integrator = integrator();
        // Just inside R_max on the axis, where the field points outward
        let start = Vec3::new(0.0, 0.0, 12.499);
        let outcome = integrator.step(start, 0.05, &mut rng);
        assert!(outcome.is_reset());
        assert!(!integrator.policy().should_reset(outcome.position_or(start)));
    }

    #[test]
    fn test_negligible_field_resets() {
        // No dipole moment: the exterior field vanishes everywhere
        let config = SimulationConfig::new(1.5, 5.0, 0.0, 0.5);
        let integrator = Integrator::new(&config);
        let mut rng = StdRng::seed_from_u64(9);
        let exterior = Vec3::new(4.0, 0.0, 0.0);

        assert_eq!(integrator.displacement(exterior, 0.02), None);

        let StepOutcome::Reset(p) = integrator.step(exterior, 0.02, &mut rng) else {
            panic!("expected a reset in a vanishing field");
        };
        assert!(p.z <= -config.half_height());
        assert!(!integrator.policy().should_reset(p));

        // The bore flow does not depend on the dipole
        let interior = Vec3::new(0.0, 0.0, 1.0);
        let outcome = integrator.step(interior, 0.02, &mut rng);
        assert_eq!(outcome, StepOutcome::Advanced(interior + AXIAL_DIRECTION * 0.5 * 0.02));
    }
}
