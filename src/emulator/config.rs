// Top-level emulator configuration: video settings plus the input bindings
// from the `input` module. Persisted as TOML at `emulator_config.toml`.

use crate::input::InputConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use tracing::warn;

const CONFIG_FILE: &str = "emulator_config.toml";

/// Top-level configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    pub video: VideoConfig,
    pub input: InputConfig,
}

/// Window/display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Window scale (1-8)
    pub scale: u32,
    /// Enable VSync
    pub vsync: bool,
    /// Target FPS (60 for NTSC)
    pub fps: u32,
    pub fullscreen: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            scale: 3,
            vsync: true,
            fps: 60,
            fullscreen: false,
        }
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            video: VideoConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl EmulatorConfig {
    /// Load from `emulator_config.toml`, falling back to defaults (and
    /// logging why) on any I/O or parse error. Never aborts startup.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "could not load emulator config, using defaults");
                Self::default()
            }
        }
    }

    pub fn load() -> Result<Self, io::Error> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_ntsc_video_settings() {
        let config = EmulatorConfig::default();
        assert_eq!(config.video.scale, 3);
        assert_eq!(config.video.fps, 60);
        assert!(config.video.vsync);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = EmulatorConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let deserialized: EmulatorConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(config.video.scale, deserialized.video.scale);
    }

    #[test]
    fn load_reports_error_when_file_is_not_valid_toml() {
        // `load` surfaces a parse error rather than panicking; `load_or_default`
        // is what swallows it into a logged fallback.
        let bad = "video = { scale = \"not a number\" }";
        let result: Result<EmulatorConfig, _> = toml::from_str(bad);
        assert!(result.is_err());
    }
}
