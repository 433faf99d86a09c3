//! # Configuration
//!
//! Tunable constants for the sandbox, grouped by the system that reads them.
//! Every field has a default, so a configuration file only needs to name the
//! values it overrides:
//!
//! ```json
//! { "player": { "speed": 0.2 }, "world": { "seed": 1234 } }
//! ```
//!
//! On native targets the file is read from the path in `VOXEL_DEMO_CONFIG`, or
//! `voxel_demo.json` in the working directory. A missing file is not an error.

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::error::DemoError;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_DEMO_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "voxel_demo.json";

/// Top-level configuration for the sandbox.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub player: PlayerConfig,
    pub interaction: InteractionConfig,
    pub world: WorldConfig,
    pub camera: CameraConfig,
}

/// Avatar dimensions and per-frame kinematics constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Height of the avatar body
    pub height: f32,
    /// Width and depth of the avatar body
    pub width: f32,
    /// Horizontal distance covered per frame for each held movement key
    pub speed: f32,
    /// Vertical velocity lost per frame while airborne
    pub gravity: f32,
    /// Vertical velocity at the start of a jump
    pub jump_impulse: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            height: 1.5,
            width: 0.5,
            speed: 0.1,
            gravity: 0.01,
            jump_impulse: 0.2,
        }
    }
}

/// Reach and timing of block interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// A block is targeted only if it is strictly closer than this
    pub reach: f32,
    /// How long the primary button must be held on a block to break it
    pub break_duration_ms: u64,
    /// Distance along the facing direction used to pick the placement cell
    pub place_distance: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reach: 3.0,
            break_duration_ms: 3500,
            place_distance: 1.5,
        }
    }
}

/// Starting world generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Cells span `-grid_radius..=grid_radius` on both horizontal axes
    pub grid_radius: i32,
    /// Chance that a grid cell starts with a block
    pub fill_probability: f32,
    /// Fixed seed for reproducible worlds
    pub seed: Option<u64>,
    /// Edge length of the square ground plane
    pub ground_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_radius: 5,
            fill_probability: 0.7,
            seed: None,
            ground_size: 50.0,
        }
    }
}

/// Projection and mouse look.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Radians of rotation per pixel of mouse motion
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            mouse_sensitivity: 0.002,
        }
    }
}

impl DemoConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DemoError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a configuration file.
    ///
    /// # Returns
    /// `Ok(None)` if the file does not exist, the parsed configuration otherwise
    pub fn load(path: &Path) -> Result<Option<Self>, DemoError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DemoError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        info!("Loading configuration from {}", path.display());
        Self::from_json(&text).map(Some)
    }

    /// Path of the configuration file for this process.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
