use glam::{Quat, Vec3};

use crate::simulation::types::{BillboardQuad, ParticleMode, Renderables};

/// A trait that defines the interface shared by both particle presentations
pub trait ParticleSystem {
    /// Name of the presentation
    fn name(&self) -> &str;

    /// Description shown by the host
    fn description(&self) -> &str;

    fn mode(&self) -> ParticleMode;

    /// Current particle positions, indexed by particle
    fn positions(&self) -> &[Vec3];

    /// Advance every particle by one frame.
    ///
    /// `view_rotation` is the camera's world orientation, used by
    /// presentations that face the viewer. Returns whether any particle
    /// moved or was reset.
    fn step_all(&mut self, dt: f32, view_rotation: Quat) -> bool;

    /// What the rendering collaborator should draw this frame
    fn renderables(&self) -> Renderables<'_>;

    /// Live quads that can be picked; empty for presentations without them
    fn quads(&self) -> &[BillboardQuad] {
        &[]
    }

    fn len(&self) -> usize {
        self.positions().len()
    }

    fn is_empty(&self) -> bool {
        self.positions().is_empty()
    }
}
