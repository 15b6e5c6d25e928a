use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SimulationConfig;
use crate::simulation::integrator::Integrator;
use crate::simulation::state::ParticleState;
use crate::simulation::trait_def::ParticleSystem;
use crate::simulation::types::{AssetId, BILLBOARD_TILT_DEGREES, BillboardQuad, ParticleMode, Renderables};

/// Particles drawn as image planes that turn towards the viewer.
pub struct BillboardSystem {
    state: ParticleState,
    quads: Vec<BillboardQuad>,
    integrator: Integrator,
    tilt: Quat,
    rng: StdRng,
}

impl BillboardSystem {
    /// Scatter the configured number of particles. Returns `None` when the
    /// catalog is empty, since every quad needs an image.
    pub fn new(config: &SimulationConfig, catalog: &[AssetId], seed: u64) -> Option<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let integrator = Integrator::new(config);
        let state = ParticleState::scatter(config.particle_count(), config.spawn_radius(), integrator.policy(), &mut rng);
        Self::build(config, state, catalog, integrator, rng)
    }

    /// Billboards at explicit positions. Positions outside the valid shell
    /// are reinitialized before the quads are created.
    pub fn with_positions(config: &SimulationConfig, positions: Vec<Vec3>, catalog: &[AssetId], seed: u64) -> Option<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let integrator = Integrator::new(config);
        let positions = positions
            .into_iter()
            .map(|p| {
                if integrator.policy().should_reset(p) { integrator.policy().reinitialize(&mut rng) } else { p }
            })
            .collect();
        Self::build(config, ParticleState::from_positions(positions), catalog, integrator, rng)
    }

    fn build(
        config: &SimulationConfig,
        state: ParticleState,
        catalog: &[AssetId],
        integrator: Integrator,
        rng: StdRng,
    ) -> Option<Self> {
        if catalog.is_empty() {
            return None;
        }

        // tag(i) = images[i mod len(images)]
        let quads = state
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, p)| BillboardQuad::new(*p, config.image_size(), catalog[i % catalog.len()].clone()))
            .collect();

        Some(Self {
            state,
            quads,
            integrator,
            tilt: Quat::from_rotation_x(BILLBOARD_TILT_DEGREES.to_radians()),
            rng,
        })
    }

    /// Turn every quad towards the viewer, then tilt it about its own X axis.
    pub fn face(&mut self, view_rotation: Quat) {
        let orientation = view_rotation * self.tilt;
        for quad in &mut self.quads {
            quad.orientation = orientation;
        }
    }
}

impl ParticleSystem for BillboardSystem {
    fn name(&self) -> &str {
        "Image particles"
    }

    fn description(&self) -> &str {
        "Image planes carried along the solenoid field; click one to show it as the background"
    }

    fn mode(&self) -> ParticleMode {
        ParticleMode::Billboard
    }

    fn positions(&self) -> &[Vec3] {
        self.state.as_slice()
    }

    fn step_all(&mut self, dt: f32, view_rotation: Quat) -> bool {
        let mut changed = false;

        for i in 0..self.state.len() {
            let Some(current) = self.state.get(i) else {
                continue;
            };
            let outcome = self.integrator.step(current, dt, &mut self.rng);
            if outcome.changed() {
                let next = outcome.position_or(current);
                self.state.set(i, next);
                // Keep the quad in sync within the same frame, resets included
                self.quads[i].position = next;
                changed = true;
            }
        }

        self.face(view_rotation);
        changed
    }

    fn renderables(&self) -> Renderables<'_> {
        Renderables::Billboards(&self.quads)
    }

    fn quads(&self) -> &[BillboardQuad] {
        &self.quads
    }
}
