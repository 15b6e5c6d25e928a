use std::fmt;
use std::sync::Arc;

use glam::{Quat, Vec3};

// Constants for the simulation
pub const NUM_PARTICLES: usize = 100;
pub const MAX_FRAME_DELTA: f32 = 0.05;
pub const BILLBOARD_TILT_DEGREES: f32 = 30.0;

// Squared-magnitude thresholds for the degenerate field cases
pub const ORIGIN_EPSILON_SQ: f32 = 1e-6;
pub const NEGLIGIBLE_FIELD_SQ: f32 = 1e-8;

/// Identifier of an image asset, shared between a billboard and the
/// selection events it produces.
pub type AssetId = Arc<str>;

/// Which presentation variant currently owns the particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleMode {
    Billboard,
    PointCloud,
}

impl ParticleMode {
    pub fn other(self) -> Self {
        match self {
            ParticleMode::Billboard => ParticleMode::PointCloud,
            ParticleMode::PointCloud => ParticleMode::Billboard,
        }
    }
}

impl fmt::Display for ParticleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleMode::Billboard => write!(f, "billboard"),
            ParticleMode::PointCloud => write!(f, "point cloud"),
        }
    }
}

/// A camera-facing image plane paired with one particle.
#[derive(Debug, Clone)]
pub struct BillboardQuad {
    pub position: Vec3,
    pub orientation: Quat,
    pub size: f32,
    tag: AssetId,
}

impl BillboardQuad {
    pub fn new(position: Vec3, size: f32, tag: AssetId) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            size,
            tag,
        }
    }

    /// Image shown on this quad. Fixed for the lifetime of the quad.
    pub fn tag(&self) -> &AssetId {
        &self.tag
    }
}

/// What the rendering collaborator consumes once per frame.
#[derive(Debug, Clone, Copy)]
pub enum Renderables<'a> {
    Points(&'a [Vec3]),
    Billboards(&'a [BillboardQuad]),
}

impl Renderables<'_> {
    pub fn len(&self) -> usize {
        match self {
            Renderables::Points(points) => points.len(),
            Renderables::Billboards(quads) => quads.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
