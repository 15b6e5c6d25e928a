use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Quat, Vec2};
use winit::window::Window;

use crate::error::GpuError;
use crate::picking::Viewport;
use crate::rendering::background::Background;
use crate::rendering::camera::Camera;
use crate::rendering::render_config::RenderConfig;
use crate::rendering::render_pass::{begin_particle_pass, draw_particles};
use crate::rendering::resources::{CameraUniform, ParticleInstance, ParticleResources, build_instances};
use crate::simulation::manager::SimulationManager;

// Main renderer struct
pub struct Renderer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,

    // Rendering configuration
    render_config: RenderConfig,
    resources: ParticleResources,
    instances: Vec<ParticleInstance>,

    // Simulation state
    last_update: Instant,
    simulation_manager: SimulationManager,

    camera: Camera,
    background: Background,

    // What the GPU buffers were last built from
    uploaded_rotation: Option<Quat>,
    uploaded_view_projection: Mat4,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, simulation_manager: SimulationManager) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        log::debug!("Using adapter: {:?}", adapter.get_info());

        let size = window.inner_size();
        let cap = surface.get_capabilities(&adapter);
        let surface_format = cap.formats[0];

        let camera = Camera::new(aspect_ratio(size));
        let background = Background::new(simulation_manager.catalog().first().cloned());

        // Create render configuration (pipeline and bind group layout)
        let render_config = RenderConfig::new(&device, surface_format);

        let capacity = simulation_manager.config().particle_count();
        let resources = ParticleResources::new(
            &device,
            &render_config,
            capacity,
            &CameraUniform::new(camera.view_projection()),
        );

        let renderer = Self {
            window,
            device,
            queue,
            size,
            surface,
            render_config,
            resources,
            instances: Vec::with_capacity(capacity),
            last_update: Instant::now(),
            simulation_manager,
            uploaded_view_projection: camera.view_projection(),
            camera,
            background,
            uploaded_rotation: None,
        };

        // Configure surface for the first time
        renderer.configure_surface();

        Ok(renderer)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn simulation(&self) -> &SimulationManager {
        &self.simulation_manager
    }

    pub fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.render_config.surface_format,
            // Request compatibility with the sRGB-format texture view we're going to create later.
            view_formats: vec![self.render_config.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.camera.set_aspect(new_size.width, new_size.height);
        self.configure_surface();
        log::debug!("Resized to {}x{}", new_size.width, new_size.height);
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.size.width, self.size.height)
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        self.camera.update(dt);
        let view_rotation = self.camera.rotation();
        self.simulation_manager.step(dt, view_rotation);

        // Rebuild instances only when particles moved, the system was
        // replaced, or the sprites have to turn with the camera
        let changed = self.simulation_manager.take_changed();
        if changed || self.uploaded_rotation != Some(view_rotation) {
            build_instances(
                self.simulation_manager.renderables(),
                self.simulation_manager.config(),
                view_rotation,
                &mut self.instances,
            );
            self.resources
                .update_instances(&self.device, &self.queue, &self.instances);
            self.uploaded_rotation = Some(view_rotation);
        }

        let view_projection = self.camera.view_projection();
        if view_projection != self.uploaded_view_projection {
            self.resources
                .update_camera(&self.queue, &CameraUniform::new(view_projection));
            self.uploaded_view_projection = view_projection;
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.update();

        let surface_texture = self.surface.get_current_texture()?;
        let texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.render_config.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Command Encoder"),
            });

        {
            let mut render_pass = begin_particle_pass(&mut encoder, &texture_view, self.background.clear_color());
            draw_particles(&mut render_pass, &self.render_config.render_pipeline, &self.resources);
        }

        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }

    /// Pick the billboard under `position` and show its image behind the particles.
    pub fn handle_click(&mut self, position: [f32; 2]) {
        let pointer = Vec2::from_array(position);
        if let Some(selection) = self
            .simulation_manager
            .pick(pointer, self.viewport(), &self.camera)
        {
            self.background.set(Some(selection.tag));
        }
    }

    pub fn toggle_mode(&mut self) {
        if self.simulation_manager.toggle_mode() {
            self.log_info();
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
        log::debug!("Camera reset to {:?}", self.camera.position());
    }

    pub fn log_info(&self) {
        let system = self.simulation_manager.system();
        log::info!(
            "{} - {} ({} particles, press M to switch, R to reset camera)",
            system.name(),
            system.description(),
            system.len()
        );
    }

    // Input handling methods
    pub fn handle_mouse_press(&mut self, position: [f32; 2]) {
        self.camera.handle_mouse_press(position);
    }

    pub fn handle_mouse_release(&mut self) {
        self.camera.handle_mouse_release();
    }

    pub fn handle_mouse_move(&mut self, position: [f32; 2]) {
        self.camera.handle_mouse_move(position);
    }

    pub fn handle_mouse_wheel(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }
}

fn aspect_ratio(size: winit::dpi::PhysicalSize<u32>) -> f32 {
    if size.width == 0 || size.height == 0 {
        1.0
    } else {
        size.width as f32 / size.height as f32
    }
}
