//! Pointer picking of billboard particles.
//!
//! A pointer position is turned into a world-space ray through the camera's
//! perspective projection and tested against every live billboard quad. The
//! closest hit becomes a [`Selection`], which carries the quad's image tag to
//! whoever displays the background.

use glam::{Vec2, Vec3};

use crate::rendering::camera::Camera;
use crate::simulation::trait_def::ParticleSystem;
use crate::simulation::types::{AssetId, BillboardQuad};

/// Size of the drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Pointer position in normalized device coordinates (-1 to 1, Y up).
    pub fn to_ndc(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(
            (pointer.x / self.width) * 2.0 - 1.0,
            -(pointer.y / self.height) * 2.0 + 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from the camera through the pointer position.
    pub fn from_screen(pointer: Vec2, viewport: Viewport, camera: &Camera) -> Self {
        let ndc = viewport.to_ndc(pointer);
        let (right, up, forward) = camera.basis();
        let half_height = (camera.fov_y() * 0.5).tan();
        let half_width = half_height * camera.aspect();

        let direction = forward + right * (ndc.x * half_width) + up * (ndc.y * half_height);
        Self::new(camera.position(), direction)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray parameter of the hit with a double-sided quad, if any.
    pub fn intersect_quad(&self, quad: &BillboardQuad) -> Option<f32> {
        let normal = quad.orientation * Vec3::Z;
        let denom = normal.dot(self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = normal.dot(quad.position - self.origin) / denom;
        if t < 0.0 {
            return None;
        }

        let local = quad.orientation.inverse() * (self.at(t) - quad.position);
        let half = quad.size * 0.5;
        (local.x.abs() <= half && local.y.abs() <= half).then_some(t)
    }
}

/// A particle chosen by the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub tag: AssetId,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PickingController;

impl PickingController {
    /// Nearest billboard under the pointer. Systems without quads never
    /// produce a selection.
    pub fn pick(
        &self,
        system: &dyn ParticleSystem,
        pointer: Vec2,
        viewport: Viewport,
        camera: &Camera,
    ) -> Option<Selection> {
        let quads = system.quads();
        if quads.is_empty() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }

        let ray = Ray::from_screen(pointer, viewport, camera);
        let (index, _) = closest_hit(&ray, quads)?;
        Some(Selection {
            index,
            tag: quads[index].tag().clone(),
        })
    }
}

fn closest_hit(ray: &Ray, quads: &[BillboardQuad]) -> Option<(usize, f32)> {
    quads
        .iter()
        .enumerate()
        .filter_map(|(i, quad)| ray.intersect_quad(quad).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
