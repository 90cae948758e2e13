// Display module - window creation and frame presentation via winit + pixels.

pub mod palette;
pub mod window;

/// NES screen width in pixels.
pub const SCREEN_WIDTH: usize = 256;
/// NES screen height in pixels.
pub const SCREEN_HEIGHT: usize = 240;

pub use palette::{palette_to_rgb, palette_to_rgba, NES_PALETTE};
pub use window::{run_emulator, EmulatorDisplayWindow, WindowConfig};
