use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat};
use wgpu::util::DeviceExt;

use crate::config::SimulationConfig;
use crate::simulation::types::Renderables;
use crate::utils::color::tag_color;

use super::render_config::RenderConfig;

const SHAPE_IMAGE: u32 = 0;
const SHAPE_POINT: u32 = 1;

// Point sprite tint (0xaaaaff) and opacities for the two presentations
const POINT_COLOR: [f32; 4] = [0.667, 0.667, 1.0, 0.7];
const IMAGE_OPACITY: f32 = 0.8;
const IMAGE_LIGHTNESS: f32 = 0.6;

// One quad per particle, expanded to six vertices in the vertex shader
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ParticleInstance {
    pub(crate) position: [f32; 3],
    pub(crate) size: f32,
    pub(crate) rotation: [f32; 4], // xyzw quaternion
    pub(crate) color: [f32; 4],
    pub(crate) shape: u32,
    pub(crate) _padding: [u32; 3],
}

impl ParticleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32,
        2 => Float32x4,
        3 => Float32x4,
        4 => Uint32
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Convert this frame's renderables into GPU instances. Point sprites face
/// the viewer directly; billboards carry their own orientation.
pub(crate) fn build_instances(
    renderables: Renderables<'_>,
    config: &SimulationConfig,
    view_rotation: Quat,
    out: &mut Vec<ParticleInstance>,
) {
    out.clear();
    match renderables {
        Renderables::Points(points) => {
            out.extend(points.iter().map(|p| ParticleInstance {
                position: p.to_array(),
                size: config.point_size(),
                rotation: view_rotation.to_array(),
                color: POINT_COLOR,
                shape: SHAPE_POINT,
                _padding: [0; 3],
            }));
        }
        Renderables::Billboards(quads) => {
            out.extend(quads.iter().map(|quad| {
                let [r, g, b] = tag_color(quad.tag(), IMAGE_LIGHTNESS);
                ParticleInstance {
                    position: quad.position.to_array(),
                    size: quad.size,
                    rotation: quad.orientation.to_array(),
                    color: [r, g, b, IMAGE_OPACITY],
                    shape: SHAPE_IMAGE,
                    _padding: [0; 3],
                }
            }));
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub(crate) view_proj: [f32; 16],
}

impl CameraUniform {
    pub(crate) fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array(),
        }
    }
}

// GPU buffers for the particle pass
pub(crate) struct ParticleResources {
    pub(crate) instance_buffer: wgpu::Buffer,
    pub(crate) camera_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) capacity: usize,
    pub(crate) instance_count: u32,
}

impl ParticleResources {
    pub(crate) fn new(device: &wgpu::Device, render_config: &RenderConfig, capacity: usize, camera: &CameraUniform) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[*camera]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = render_config.create_bind_group(device, &camera_buffer);

        Self {
            instance_buffer: Self::create_instance_buffer(device, capacity),
            camera_buffer,
            bind_group,
            capacity,
            instance_count: 0,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instance Buffer"),
            size: (capacity.max(1) * std::mem::size_of::<ParticleInstance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub(crate) fn update_instances(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[ParticleInstance]) {
        if instances.len() > self.capacity {
            self.capacity = instances.len();
            self.instance_buffer = Self::create_instance_buffer(device, self.capacity);
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        self.instance_count = instances.len() as u32;
    }

    pub(crate) fn update_camera(&self, queue: &wgpu::Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*camera]));
    }
}
