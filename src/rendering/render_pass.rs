use super::resources::ParticleResources;

/// Begin the frame's only pass, clearing to the background colour.
pub(super) fn begin_particle_pass<'a>(
    encoder: &'a mut wgpu::CommandEncoder,
    texture_view: &'a wgpu::TextureView,
    background: wgpu::Color,
) -> wgpu::RenderPass<'a> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Particle Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: texture_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(background),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    })
}

// Six vertices (two triangles) per particle instance
pub(super) fn draw_particles(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    resources: &ParticleResources,
) {
    if resources.instance_count == 0 {
        return;
    }
    render_pass.set_pipeline(pipeline);
    render_pass.set_bind_group(0, &resources.bind_group, &[]);
    render_pass.set_vertex_buffer(0, resources.instance_buffer.slice(..));
    render_pass.draw(0..6, 0..resources.instance_count);
}
