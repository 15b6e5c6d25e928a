use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SimulationConfig;
use crate::simulation::integrator::Integrator;
use crate::simulation::state::ParticleState;
use crate::simulation::trait_def::ParticleSystem;
use crate::simulation::types::{ParticleMode, Renderables};

/// Particles drawn in bulk from one contiguous position buffer.
pub struct PointCloudSystem {
    state: ParticleState,
    integrator: Integrator,
    rng: StdRng,
}

impl PointCloudSystem {
    pub fn new(config: &SimulationConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let integrator = Integrator::new(config);
        let state = ParticleState::scatter(config.particle_count(), config.spawn_radius(), integrator.policy(), &mut rng);

        Self {
            state,
            integrator,
            rng,
        }
    }
}

impl ParticleSystem for PointCloudSystem {
    fn name(&self) -> &str {
        "Point cloud"
    }

    fn description(&self) -> &str {
        "Glowing points carried along the solenoid field"
    }

    fn mode(&self) -> ParticleMode {
        ParticleMode::PointCloud
    }

    fn positions(&self) -> &[Vec3] {
        self.state.as_slice()
    }

    fn step_all(&mut self, dt: f32, _view_rotation: Quat) -> bool {
        let mut changed = false;

        for i in 0..self.state.len() {
            let Some(current) = self.state.get(i) else {
                continue;
            };
            let outcome = self.integrator.step(current, dt, &mut self.rng);
            if outcome.changed() {
                self.state.set(i, outcome.position_or(current));
                changed = true;
            }
        }

        changed
    }

    fn renderables(&self) -> Renderables<'_> {
        Renderables::Points(self.state.as_slice())
    }
}
