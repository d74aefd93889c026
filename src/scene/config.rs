//! Scene parameters and the JSON scene configuration

use std::path::Path;

use glam::{IVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::voxel::MergeConfig;

/// Camera and projection parameters carried by a compiled scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Distance from the eye to the look-at target along Y
    pub cam_dist: f32,
    /// Camera height (Z)
    pub cam_height: f32,
    pub cam_target: Vec3,
    /// Shear applied along X/Y proportional to Z; zero disables it
    pub shearing: Vec2,
    /// Secondary shear scaled by the camera Y position; zero disables it
    pub offset: Vec2,
    pub moving_speed: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            fov: 108.0,
            cam_dist: 106.0,
            cam_height: 46.0,
            cam_target: Vec3::new(127.0, 35.0, 0.0),
            shearing: Vec2::new(0.0, -0.6),
            offset: Vec2::new(0.0, 0.1),
            moving_speed: 35.0,
        }
    }
}

/// Largest construct box the generator accepts
pub const MAX_BOX_SIZE: IVec3 = IVec3::new(1024, 256, 256);

/// Everything needed to compile a scene from scratch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    /// Interior size of the construct box
    pub size: [i32; 3],
    pub roof: bool,
    pub margin: i32,
    pub merge: MergeConfig,
    pub params: SceneParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "construct".to_string(),
            size: [128, 64, 64],
            roof: false,
            margin: 0,
            merge: MergeConfig::default(),
            params: SceneParams::default(),
        }
    }
}

impl SceneConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Box size clamped to `1..=MAX_BOX_SIZE` on each axis
    pub fn box_size(&self) -> IVec3 {
        IVec3::from_array(self.size).clamp(IVec3::ONE, MAX_BOX_SIZE)
    }
}
