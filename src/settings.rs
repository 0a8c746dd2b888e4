//! Game settings and preferences
//!
//! Persisted as JSON next to the executable. Command line flags override
//! whatever was loaded.

use std::io;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FPS, DEFAULT_GRID, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Default settings file
pub const DEFAULT_SETTINGS_PATH: &str = "flying_objects.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    /// Play area width in pixels
    pub width: u32,
    /// Play area height in pixels
    pub height: u32,
    /// Target frames per second
    pub fps: u32,

    // === World ===
    /// Grid cell size in pixels
    pub grid: u32,
    /// Draw motion trails
    pub trails: bool,
    /// RNG seed; 0 picks one from the clock
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            grid: DEFAULT_GRID,
            trails: true,
            seed: 0,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(err) => {
                warn!("Cannot read {}: {}, using defaults", path.display(), err);
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(err) => {
                warn!("Corrupt settings in {}: {}, using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Zero sizes and rates are bumped to 1
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.fps = self.fps.max(1);
        self.grid = self.grid.max(1);
        self
    }

    /// Seconds per frame at the target rate
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!((settings.width, settings.height), (640, 400));
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.grid, 50);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"width": 800, "fps": 0}"#).unwrap();
        let settings = settings.sanitized();
        assert_eq!(settings.width, 800);
        assert_eq!(settings.height, DEFAULT_HEIGHT);
        assert_eq!(settings.fps, 1);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "flying-objects-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            width: 1024,
            seed: 77,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = Path::new("/nonexistent/flying_objects.json");
        assert_eq!(Settings::load(path), Settings::default());
    }
}
