use glam::{Mat3, Mat4, Quat, Vec3};

const DEFAULT_EYE: Vec3 = Vec3::new(6.0, 5.0, 7.0);
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 30.0;
// Keeps the view direction away from the up vector
const MAX_PITCH: f32 = 1.5;
// Fraction of the remaining orbit applied per 60 Hz frame
const DAMPING_FACTOR: f32 = 0.05;
const SETTLE_EPSILON: f32 = 1e-5;

// Perspective camera orbiting a target point, Y up
#[derive(Debug, Clone)]
pub struct Camera {
    // Orbit state; yaw and pitch ease towards the drag targets
    yaw: f32,
    pitch: f32,
    target_yaw: f32,
    target_pitch: f32,
    distance: f32,
    target: Vec3,

    // Projection
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,

    // Mouse interaction state for camera control
    mouse_pressed: bool,
    last_mouse_position: [f32; 2],
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self::looking_at(DEFAULT_EYE, Vec3::ZERO, aspect)
    }

    /// Camera placed at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
        let yaw = offset.x.atan2(offset.z);

        Self {
            yaw,
            pitch,
            target_yaw: yaw,
            target_pitch: pitch,
            distance,
            target,
            fov_y: 75.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
            mouse_pressed: false,
            last_mouse_position: [0.0, 0.0],
        }
    }

    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Unit vectors (right, up, forward) of the camera in world space.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// World orientation of the camera; local -Z looks at the target.
    pub fn rotation(&self) -> Quat {
        let (right, up, forward) = self.basis();
        Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Queue an orbit by a mouse delta in pixels. The camera catches up in
    /// [`Camera::update`].
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.target_yaw -= delta_x * 0.005;
        self.target_pitch = (self.target_pitch + delta_y * 0.005).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Ease yaw and pitch towards the orbit target. Returns whether the
    /// camera moved.
    pub fn update(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        let before = (self.yaw, self.pitch);
        let blend = 1.0 - (1.0 - DAMPING_FACTOR).powf(dt * 60.0);

        self.yaw = settle(self.yaw, self.target_yaw, blend);
        self.pitch = settle(self.pitch, self.target_pitch, blend);
        (self.yaw, self.pitch) != before
    }

    pub fn is_settled(&self) -> bool {
        self.yaw == self.target_yaw && self.pitch == self.target_pitch
    }

    pub fn zoom(&mut self, delta: f32) {
        // Apply zoom (delta is positive for zoom in, negative for zoom out)
        let zoom_speed = 0.1;
        let new_distance = self.distance * (1.0 - delta * zoom_speed);
        self.distance = new_distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.aspect);
    }

    // Input handling methods
    pub fn handle_mouse_press(&mut self, position: [f32; 2]) {
        self.mouse_pressed = true;
        self.last_mouse_position = position;
    }

    pub fn handle_mouse_release(&mut self) {
        self.mouse_pressed = false;
    }

    pub fn handle_mouse_move(&mut self, position: [f32; 2]) -> bool {
        if !self.mouse_pressed {
            return false;
        }
        let delta_x = position[0] - self.last_mouse_position[0];
        let delta_y = position[1] - self.last_mouse_position[1];
        self.last_mouse_position = position;
        self.orbit(delta_x, delta_y);
        true
    }
}

fn settle(current: f32, target: f32, blend: f32) -> f32 {
    let next = current + (target - current) * blend;
    if (target - next).abs() < SETTLE_EPSILON { target } else { next }
}
