pub mod background;
pub mod camera;
mod render_config;
mod render_pass;
mod renderer;
mod resources;

pub use renderer::Renderer;
