// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration, loaded from RON.

use anyhow::{Context, Result};
use cinder_core::math::Vec3;
use cinder_core::scene::Camera;
use cinder_infra::logging::DEFAULT_LOG_FILTER;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The initial camera of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub position: [f32; 3],
    /// Look-at target.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport width over height.
    pub aspect_ratio: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Units moved per movement step.
    pub speed: f32,
    /// Radians turned per rotation step.
    pub rotation_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            speed: 0.1,
            rotation_speed: 0.005,
        }
    }
}

impl CameraConfig {
    /// Builds a camera with these settings.
    pub fn build(&self) -> Camera {
        let mut camera = Camera::new(self.aspect_ratio);
        camera.set_position(Vec3::from_array(self.position));
        camera.set_target(Vec3::from_array(self.target));
        camera.set_field_of_view(self.fov_degrees);
        camera.set_near(self.near);
        camera.set_far(self.far);
        camera.set_speed(self.speed);
        camera.set_rotation_speed(self.rotation_speed);
        camera
    }
}

/// Top-level engine settings.
///
/// Every field has a default, so a partial file such as
/// `(log_filter: "debug")` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Filter passed to `env_logger` when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Flip decoded images so row 0 is the bottom row, as GL expects.
    pub flip_textures: bool,
    /// Initial camera settings.
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            flip_textures: true,
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).context("EngineConfig: Invalid RON configuration")
    }

    /// Reads and parses a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("EngineConfig: Could not read '{}'", path.display()))?;
        Self::from_ron_str(&text)
            .with_context(|| format!("EngineConfig: Could not load '{}'", path.display()))
    }

    /// Serializes the configuration as pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("EngineConfig: Serialization failed")
    }
}
