use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::SimulationConfig;
use crate::error::AppError;
use crate::rendering::Renderer;
use crate::simulation::manager::SimulationManager;
use crate::simulation::types::{AssetId, ParticleMode};

// Press and release closer than this (in pixels) count as a click, not a drag
const CLICK_TOLERANCE: f32 = 4.0;

/// Everything needed to build the simulation once a window exists.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: SimulationConfig,
    pub catalog: Vec<AssetId>,
    pub preferred_mode: ParticleMode,
    pub seed: Option<u64>,
}

pub struct App {
    startup: Startup,
    state: Option<Renderer>,
    error: Option<AppError>,
    last_cursor: [f32; 2],
    press_position: Option<[f32; 2]>,
}

impl App {
    pub fn new(startup: Startup) -> Self {
        Self {
            startup,
            state: None,
            error: None,
            last_cursor: [0.0, 0.0],
            press_position: None,
        }
    }

    fn create_renderer(&self, event_loop: &ActiveEventLoop) -> Result<Renderer, AppError> {
        let attributes = Window::default_attributes().with_title("Solenoid Flow");
        let window = Arc::new(event_loop.create_window(attributes)?);

        let startup = self.startup.clone();
        let manager = SimulationManager::new(startup.config, startup.catalog, startup.preferred_mode, startup.seed);
        let renderer = pollster::block_on(Renderer::new(window, manager))?;
        Ok(renderer)
    }
}

fn is_click(press: [f32; 2], release: [f32; 2]) -> bool {
    let dx = release[0] - press[0];
    let dy = release[1] - press[1];
    dx * dx + dy * dy <= CLICK_TOLERANCE * CLICK_TOLERANCE
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.create_renderer(event_loop) {
            Ok(state) => {
                state.log_info();
                state.window().request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                match state.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.configure_surface(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory; stopping");
                        event_loop.exit();
                    }
                    Err(e) => log::error!("Render error: {}", e),
                }
                // Emits a new redraw requested event.
                state.window().request_redraw();
            }
            WindowEvent::Resized(size) => {
                // Reconfigures the size of the surface. We do not re-render
                // here as this event is always followed up by redraw request.
                state.resize(size);
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => state.handle_mouse_wheel(y),
                // Touchpad gesture - needs smaller scaling factor to feel natural
                MouseScrollDelta::PixelDelta(position) => state.handle_mouse_wheel(position.y as f32 * 0.003),
            },
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => {
                    self.press_position = Some(self.last_cursor);
                    state.handle_mouse_press(self.last_cursor);
                }
                ElementState::Released => {
                    state.handle_mouse_release();
                    if let Some(press) = self.press_position.take() {
                        if is_click(press, self.last_cursor) {
                            state.handle_click(self.last_cursor);
                        }
                    }
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = [position.x as f32, position.y as f32];
                state.handle_mouse_move(self.last_cursor);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::KeyM => state.toggle_mode(),
                KeyCode::KeyR => state.reset_camera(),
                KeyCode::KeyI => state.log_info(),
                KeyCode::Escape => event_loop.exit(),
                _ => (),
            },
            _ => (),
        }
    }
}

pub fn run(startup: Startup) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(startup);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_motion_is_click() {
        assert!(is_click([100.0, 100.0], [102.0, 101.0]));
    }

    #[test]
    fn test_drag_is_not_click() {
        assert!(!is_click([100.0, 100.0], [120.0, 100.0]));
    }
}
