use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Mouse counts to radians: the default sensitivity of 0.1 turns 0.002 rad per count.
pub const LOOK_SCALE: f32 = 0.02;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User preferences. Keys missing from a file keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mouse_sensitivity: f32,
    pub audio_volume: f32,
    pub fullscreen: bool,
    pub fov: f32,
    pub crosshair_color: [u8; 3],
    pub crosshair_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.1,
            audio_volume: 0.7,
            fullscreen: false,
            fov: 60.0,
            crosshair_color: [255, 255, 255],
            crosshair_size: 10,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// A missing file is not an error; an unreadable one is logged.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings, {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn look_sensitivity(&self) -> f32 {
        self.mouse_sensitivity * LOOK_SCALE
    }
}
