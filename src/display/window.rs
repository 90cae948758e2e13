// Window module - creates the display window and drives the emulator from
// the winit event loop, using winit + pixels for presentation and gilrs
// (via UnifiedInputHandler) for gamepad polling.

use super::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::emulator::Emulator;
use crate::input::{Player, UnifiedInputHandler};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window configuration (scale, target FPS, VSync).
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    pub scale: u32,
    pub target_fps: u32,
    pub vsync: bool,
}

impl WindowConfig {
    pub fn new() -> Self {
        Self {
            scale: 3,
            target_fps: 60,
            vsync: true,
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn window_width(&self) -> u32 {
        SCREEN_WIDTH as u32 * self.scale
    }

    pub fn window_height(&self) -> u32 {
        SCREEN_HEIGHT as u32 * self.scale
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack the PPU's 0xAARRGGBB frame buffer into the RGBA8 byte order `pixels` expects.
fn write_frame_rgba(frame: &[u32], out: &mut [u8]) {
    for (px, chunk) in frame.iter().zip(out.chunks_exact_mut(4)) {
        chunk[0] = (px >> 16) as u8; // R
        chunk[1] = (px >> 8) as u8; // G
        chunk[2] = *px as u8; // B
        chunk[3] = (px >> 24) as u8; // A
    }
}

/// Drives a loaded `Emulator` from a winit event loop, presenting each
/// completed frame through `pixels` and feeding keyboard/gamepad state back
/// into the NES controller ports.
pub struct EmulatorDisplayWindow {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    emulator: Emulator,
    last_frame_time: Instant,
    input: UnifiedInputHandler,
}

impl EmulatorDisplayWindow {
    pub fn new(config: WindowConfig, emulator: Emulator) -> Self {
        Self {
            window: None,
            pixels: None,
            config,
            emulator,
            last_frame_time: Instant::now(),
            input: UnifiedInputHandler::new(),
        }
    }

    pub fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut Emulator {
        &mut self.emulator
    }

    fn poll_controllers(&mut self) {
        self.input.update_gamepads();
        let p1 = self.input.get_controller_state(Player::One);
        let p2 = self.input.get_controller_state(Player::Two);
        self.emulator.set_controller_state(0, p1);
        self.emulator.set_controller_state(1, p2);
    }

    fn render(&mut self) -> Result<(), pixels::Error> {
        if let Some(pixels) = &mut self.pixels {
            let frame = pixels.frame_mut();
            write_frame_rgba(self.emulator.bus().ppu().frame(), frame);
            pixels.render()?;
        }
        Ok(())
    }

    fn should_render_frame(&mut self) -> bool {
        let elapsed = self.last_frame_time.elapsed();
        if elapsed >= self.config.frame_duration() {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl ApplicationHandler for EmulatorDisplayWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(format!(
                "NES - {}x{}",
                self.config.window_width(),
                self.config.window_height()
            ))
            .with_inner_size(LogicalSize::new(
                self.config.window_width(),
                self.config.window_height(),
            ))
            .with_resizable(false);

        let window = event_loop
            .create_window(window_attributes)
            .expect("failed to create window");
        let window = Arc::new(window);
        let window_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface_texture)
            .expect("failed to create pixel buffer");

        self.window = Some(window);
        self.pixels = Some(pixels);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                match state {
                    ElementState::Pressed => self.input.handle_key_press(physical_key),
                    ElementState::Released => self.input.handle_key_release(physical_key),
                }
                self.poll_controllers();
            }
            WindowEvent::RedrawRequested => {
                if self.should_render_frame() {
                    self.poll_controllers();
                    self.emulator.run_frame();
                    if let Err(err) = self.render() {
                        error!(%err, "render failed");
                        event_loop.exit();
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Run a loaded emulator in a window until the user closes it.
pub fn run_emulator(
    config: WindowConfig,
    emulator: Emulator,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(if config.vsync {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    });

    let mut display = EmulatorDisplayWindow::new(config, emulator);
    event_loop.run_app(&mut display)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_config_defaults() {
        let config = WindowConfig::new();
        assert_eq!(config.scale, 3);
        assert_eq!(config.target_fps, 60);
        assert!(config.vsync);
    }

    #[test]
    fn window_config_builder() {
        let config = WindowConfig::new().with_scale(2).with_fps(30).with_vsync(false);
        assert_eq!(config.scale, 2);
        assert_eq!(config.target_fps, 30);
        assert!(!config.vsync);
    }

    #[test]
    fn window_dimensions() {
        let config = WindowConfig::new().with_scale(2);
        assert_eq!(config.window_width(), 512);
        assert_eq!(config.window_height(), 480);
    }

    #[test]
    fn scale_clamping() {
        assert_eq!(WindowConfig::new().with_scale(100).scale, 8);
        assert_eq!(WindowConfig::new().with_scale(0).scale, 1);
    }

    #[test]
    fn frame_rgba_unpacks_argb_u32_into_byte_order() {
        let frame = [0xFF112233u32];
        let mut out = [0u8; 4];
        write_frame_rgba(&frame, &mut out);
        assert_eq!(out, [0x11, 0x22, 0x33, 0xFF]);
    }
}
