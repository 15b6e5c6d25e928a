use glam::{Quat, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::picking::{PickingController, Selection, Viewport};
use crate::rendering::camera::Camera;
use crate::simulation::billboard::BillboardSystem;
use crate::simulation::point_cloud::PointCloudSystem;
use crate::simulation::trait_def::ParticleSystem;
use crate::simulation::types::{AssetId, ParticleMode, Renderables};

/// Owns the active particle presentation and rebuilds it on mode switches.
pub struct SimulationManager {
    config: SimulationConfig,
    catalog: Vec<AssetId>,
    system: Box<dyn ParticleSystem>,
    picking: PickingController,
    rng: StdRng,
    // Set when positions or the system changed since the renderer last looked
    changed: bool,
}

impl SimulationManager {
    /// Start in `preferred` mode, falling back to the point cloud when the
    /// catalog has no images.
    pub fn new(config: SimulationConfig, catalog: Vec<AssetId>, preferred: ParticleMode, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mode = if preferred == ParticleMode::Billboard && catalog.is_empty() {
            log::warn!("No images in the catalog, initializing point cloud particles instead");
            ParticleMode::PointCloud
        } else {
            preferred
        };

        let system: Box<dyn ParticleSystem> = match build_system(mode, &config, &catalog, &mut rng) {
            Some(system) => system,
            None => Box::new(PointCloudSystem::new(&config, rng.gen_range(0..u64::MAX))),
        };

        Self {
            config,
            catalog,
            system,
            picking: PickingController,
            rng,
            changed: true,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[AssetId] {
        &self.catalog
    }

    pub fn mode(&self) -> ParticleMode {
        self.system.mode()
    }

    pub fn system(&self) -> &dyn ParticleSystem {
        self.system.as_ref()
    }

    pub fn renderables(&self) -> Renderables<'_> {
        self.system.renderables()
    }

    /// Number of renderable items exposed this frame.
    pub fn renderable_count(&self) -> usize {
        self.system.renderables().len()
    }

    /// Number of live billboard quads; zero outside billboard mode.
    pub fn quad_count(&self) -> usize {
        self.system.quads().len()
    }

    /// Advance the active system by one frame.
    pub fn step(&mut self, dt: f32, view_rotation: Quat) -> bool {
        let moved = self.system.step_all(dt, view_rotation);
        self.changed |= moved;
        moved
    }

    /// Whether anything moved or the system was rebuilt since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Tear down the active particles and build a fresh set in `mode`.
    /// Refuses (and keeps the current system) when billboards are requested
    /// without images.
    pub fn switch_mode(&mut self, mode: ParticleMode) -> bool {
        match build_system(mode, &self.config, &self.catalog, &mut self.rng) {
            Some(system) => {
                self.system = system;
                self.changed = true;
                true
            }
            None => {
                log::warn!("Cannot switch to {} particles: the image catalog is empty", mode);
                false
            }
        }
    }

    pub fn toggle_mode(&mut self) -> bool {
        self.switch_mode(self.mode().other())
    }

    /// Resolve a pointer click to the nearest billboard, if any.
    pub fn pick(&self, pointer: Vec2, viewport: Viewport, camera: &Camera) -> Option<Selection> {
        let selection = self.picking.pick(self.system.as_ref(), pointer, viewport, camera)?;
        log::info!("Clicked particle {}: {}", selection.index, selection.tag);
        Some(selection)
    }
}

fn build_system(
    mode: ParticleMode,
    config: &SimulationConfig,
    catalog: &[AssetId],
    rng: &mut StdRng,
) -> Option<Box<dyn ParticleSystem>> {
    let seed = rng.gen_range(0..u64::MAX);
    let system: Box<dyn ParticleSystem> = match mode {
        ParticleMode::Billboard => Box::new(BillboardSystem::new(config, catalog, seed)?),
        ParticleMode::PointCloud => Box::new(PointCloudSystem::new(config, seed)),
    };

    match mode {
        ParticleMode::Billboard => log::info!("Initialized image particles ({})", system.len()),
        ParticleMode::PointCloud => log::info!("Initialized point cloud particles ({})", system.len()),
    }
    Some(system)
}
