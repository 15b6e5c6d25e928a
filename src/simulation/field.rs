use glam::Vec3;

use crate::simulation::types::ORIGIN_EPSILON_SQ;

/// Field of an ideal magnetic dipole at the origin.
///
/// Only meaningful outside the solenoid bore; the integrator replaces the
/// interior with a uniform axial flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DipoleField {
    moment: Vec3,
}

impl DipoleField {
    pub fn new(moment: Vec3) -> Self {
        Self { moment }
    }

    pub fn moment(&self) -> Vec3 {
        self.moment
    }

    /// B(r) = 3 (m·r) r / |r|^5 - m / |r|^3, and zero near the origin.
    pub fn field(&self, position: Vec3) -> Vec3 {
        let r_sq = position.length_squared();
        if r_sq < ORIGIN_EPSILON_SQ {
            return Vec3::ZERO;
        }
        let r = r_sq.sqrt();
        let r3 = r_sq * r;
        let r5 = r3 * r_sq;

        let m_dot_r = self.moment.dot(position);
        position * (3.0 * m_dot_r / r5) - self.moment / r3
    }
}
