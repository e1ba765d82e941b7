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

//! Defines the light types bound to the lit pipelines.
//!
//! Each light is a standalone record mirrored into its own uniform block. Every
//! setter marks the block dirty; the buffer is only rewritten on the next
//! [`UniformBlock::uniform_buffer`] call.

use crate::math::{rotation_yxz, Vec3, Vec4, FRAC_PI_2};
use crate::renderer::uniform::{UniformBlock, UniformState};
use bytemuck::{Pod, Zeroable};

/// Block name of the directional light in the lit shaders.
pub const DIRECTIONAL_LIGHT_BLOCK: &str = "u_directional_light";
/// Block name of the point light in the lit shaders.
pub const POINT_LIGHT_BLOCK: &str = "u_point_light";
/// Block name of the spot light in the lit shaders.
pub const SPOT_LIGHT_BLOCK: &str = "u_spot_light";

#[inline]
fn flag(enabled: bool) -> f32 {
    if enabled {
        1.0
    } else {
        0.0
    }
}

/// GPU layout of [`DirectionalLight`] (48 bytes, std140).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// Direction, `w = 0`.
    pub direction: [f32; 4],
    /// RGBA color.
    pub color: [f32; 4],
    /// `1.0` when enabled.
    pub enabled: f32,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Padding to a 16-byte multiple.
    pub _padding: [f32; 2],
}

/// A directional light source that illuminates from a uniform direction.
///
/// Directional lights simulate infinitely distant sources like the sun: no
/// position, parallel rays and no attenuation.
///
/// # Examples
///
/// ```
/// use cinder_core::math::Vec3;
/// use cinder_core::renderer::light::DirectionalLight;
///
/// let mut sun = DirectionalLight::new();
/// sun.set_direction(Vec3::new(-0.5, -1.0, -0.3));
/// assert!(sun.is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    direction: Vec3,
    color: Vec4,
    enabled: bool,
    intensity: f32,
    uniform: UniformState,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, -1.0, -1.0),
            color: Vec4::ONE,
            enabled: true,
            intensity: 1.0,
            uniform: UniformState::new(),
        }
    }
}

impl DirectionalLight {
    /// Creates a white, enabled light pointing along `(1, -1, -1)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction the light travels in.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// The RGBA color.
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Whether the light contributes to shading.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The intensity multiplier.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Sets the direction the light travels in.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
        self.uniform.mark_dirty();
    }

    /// Sets the RGBA color.
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.uniform.mark_dirty();
    }

    /// Enables or disables the light.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.uniform.mark_dirty();
    }

    /// Sets the intensity multiplier.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
        self.uniform.mark_dirty();
    }
}

impl UniformBlock for DirectionalLight {
    type Raw = DirectionalLightUniform;
    const BLOCK_NAME: &'static str = DIRECTIONAL_LIGHT_BLOCK;

    fn to_raw(&self) -> Self::Raw {
        DirectionalLightUniform {
            direction: self.direction.extend(0.0).to_array(),
            color: self.color.to_array(),
            enabled: flag(self.enabled),
            intensity: self.intensity,
            _padding: [0.0; 2],
        }
    }

    fn uniform_state(&self) -> &UniformState {
        &self.uniform
    }

    fn uniform_state_mut(&mut self) -> &mut UniformState {
        &mut self.uniform
    }
}

/// GPU layout of [`PointLight`] (64 bytes, std140).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    /// Position, `w = 1`.
    pub position: [f32; 4],
    /// RGBA color.
    pub color: [f32; 4],
    /// Constant attenuation.
    pub kc: f32,
    /// Linear attenuation.
    pub kl: f32,
    /// Quadratic attenuation.
    pub kq: f32,
    /// Maximum lit distance.
    pub range: f32,
    /// `1.0` when enabled.
    pub enabled: f32,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Padding to a 16-byte multiple.
    pub _padding: [f32; 2],
}

/// Distance attenuation shared by point and spot lights.
///
/// The contribution is scaled by `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attenuation {
    /// Constant term.
    pub constant: f32,
    /// Linear term.
    pub linear: f32,
    /// Quadratic term.
    pub quadratic: f32,
}

impl Attenuation {
    /// Evaluates the attenuation factor at distance `d`.
    ///
    /// A zero denominator yields full intensity.
    pub fn factor(&self, d: f32) -> f32 {
        let denominator = self.constant + self.linear * d + self.quadratic * d * d;
        if denominator > 0.0 {
            1.0 / denominator
        } else {
            1.0
        }
    }
}

/// A point light source that emits light in all directions from a single point.
#[derive(Debug, Clone)]
pub struct PointLight {
    position: Vec3,
    color: Vec4,
    range: f32,
    attenuation: Attenuation,
    intensity: f32,
    enabled: bool,
    uniform: UniformState,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Vec4::ONE,
            range: 1.0,
            attenuation: Attenuation::default(),
            intensity: 1.0,
            enabled: true,
            uniform: UniformState::new(),
        }
    }
}

impl PointLight {
    /// Creates a white, enabled light at the origin with a range of 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The RGBA color.
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Distance beyond which the light has no effect.
    pub fn range(&self) -> f32 {
        self.range
    }

    /// The attenuation coefficients.
    pub fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    /// The intensity multiplier.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Whether the light contributes to shading.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the world-space position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.uniform.mark_dirty();
    }

    /// Sets the RGBA color.
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.uniform.mark_dirty();
    }

    /// Sets the maximum lit distance.
    pub fn set_range(&mut self, range: f32) {
        self.range = range;
        self.uniform.mark_dirty();
    }

    /// Sets all three attenuation coefficients.
    pub fn set_attenuation(&mut self, attenuation: Attenuation) {
        self.attenuation = attenuation;
        self.uniform.mark_dirty();
    }

    /// Sets the constant attenuation coefficient.
    pub fn set_constant_attenuation(&mut self, kc: f32) {
        self.attenuation.constant = kc;
        self.uniform.mark_dirty();
    }

    /// Sets the linear attenuation coefficient.
    pub fn set_linear_attenuation(&mut self, kl: f32) {
        self.attenuation.linear = kl;
        self.uniform.mark_dirty();
    }

    /// Sets the quadratic attenuation coefficient.
    pub fn set_quadratic_attenuation(&mut self, kq: f32) {
        self.attenuation.quadratic = kq;
        self.uniform.mark_dirty();
    }

    /// Sets the intensity multiplier.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
        self.uniform.mark_dirty();
    }

    /// Enables or disables the light.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.uniform.mark_dirty();
    }
}

impl UniformBlock for PointLight {
    type Raw = PointLightUniform;
    const BLOCK_NAME: &'static str = POINT_LIGHT_BLOCK;

    fn to_raw(&self) -> Self::Raw {
        PointLightUniform {
            position: self.position.extend(1.0).to_array(),
            color: self.color.to_array(),
            kc: self.attenuation.constant,
            kl: self.attenuation.linear,
            kq: self.attenuation.quadratic,
            range: self.range,
            enabled: flag(self.enabled),
            intensity: self.intensity,
            _padding: [0.0; 2],
        }
    }

    fn uniform_state(&self) -> &UniformState {
        &self.uniform
    }

    fn uniform_state_mut(&mut self) -> &mut UniformState {
        &mut self.uniform
    }
}

/// GPU layout of [`SpotLight`] (96 bytes, std140).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpotLightUniform {
    /// Position, `w = 1`.
    pub position: [f32; 4],
    /// Direction after rotation, `w = 0`.
    pub direction: [f32; 4],
    /// RGBA color.
    pub color: [f32; 4],
    /// Constant attenuation.
    pub kc: f32,
    /// Linear attenuation.
    pub kl: f32,
    /// Quadratic attenuation.
    pub kq: f32,
    /// Maximum lit distance.
    pub range: f32,
    /// `1.0` when enabled.
    pub enabled: f32,
    /// Cone half angle in radians.
    pub spot_angle: f32,
    /// Inner cone angle in radians.
    pub inner_angle: f32,
    /// Outer cone angle in radians.
    pub extern_angle: f32,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Rotation about X in radians.
    pub angle_x: f32,
    /// Rotation about Y in radians.
    pub angle_y: f32,
    /// Rotation about Z in radians.
    pub angle_z: f32,
}

/// A spot light source that emits light in a cone from a single point.
///
/// The emitted direction is the base direction rotated by `Ry · Rx · Rz` of the
/// three Euler angles, recomputed whenever one of them changes.
#[derive(Debug, Clone)]
pub struct SpotLight {
    position: Vec3,
    base_direction: Vec3,
    direction: Vec3,
    color: Vec4,
    range: f32,
    attenuation: Attenuation,
    spot_angle: f32,
    inner_angle: f32,
    extern_angle: f32,
    angles: Vec3,
    intensity: f32,
    enabled: bool,
    uniform: UniformState,
}

impl Default for SpotLight {
    fn default() -> Self {
        let spot_angle = FRAC_PI_2 / 3.0;
        Self {
            position: Vec3::ZERO,
            base_direction: Vec3::NEG_Y,
            direction: Vec3::NEG_Y,
            color: Vec4::ONE,
            range: 1.0,
            attenuation: Attenuation::default(),
            spot_angle,
            inner_angle: FRAC_PI_2 / 4.0,
            extern_angle: spot_angle,
            angles: Vec3::ZERO,
            intensity: 1.0,
            enabled: true,
            uniform: UniformState::new(),
        }
    }
}

impl SpotLight {
    /// Creates a white, enabled light at the origin pointing down.
    pub fn new() -> Self {
        Self::default()
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The emitted direction, after rotation.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// The RGBA color.
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Distance beyond which the light has no effect.
    pub fn range(&self) -> f32 {
        self.range
    }

    /// The attenuation coefficients.
    pub fn attenuation(&self) -> Attenuation {
        self.attenuation
    }

    /// The cone half angle in radians, used for the smooth falloff.
    pub fn spot_angle(&self) -> f32 {
        self.spot_angle
    }

    /// The inner cone angle in radians.
    pub fn inner_angle(&self) -> f32 {
        self.inner_angle
    }

    /// The outer cone angle in radians.
    pub fn extern_angle(&self) -> f32 {
        self.extern_angle
    }

    /// The Euler angles `(x, y, z)` in radians applied to the base direction.
    pub fn angles(&self) -> Vec3 {
        self.angles
    }

    /// The intensity multiplier.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Whether the light contributes to shading.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the world-space position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.uniform.mark_dirty();
    }

    /// Sets the base direction, then applies the current Euler angles to it.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.base_direction = direction;
        self.rotate();
    }

    /// Sets the RGBA color.
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.uniform.mark_dirty();
    }

    /// Sets the maximum lit distance.
    pub fn set_range(&mut self, range: f32) {
        self.range = range;
        self.uniform.mark_dirty();
    }

    /// Sets all three attenuation coefficients.
    pub fn set_attenuation(&mut self, attenuation: Attenuation) {
        self.attenuation = attenuation;
        self.uniform.mark_dirty();
    }

    /// Sets the constant attenuation coefficient.
    pub fn set_constant_attenuation(&mut self, kc: f32) {
        self.attenuation.constant = kc;
        self.uniform.mark_dirty();
    }

    /// Sets the linear attenuation coefficient.
    pub fn set_linear_attenuation(&mut self, kl: f32) {
        self.attenuation.linear = kl;
        self.uniform.mark_dirty();
    }

    /// Sets the quadratic attenuation coefficient.
    pub fn set_quadratic_attenuation(&mut self, kq: f32) {
        self.attenuation.quadratic = kq;
        self.uniform.mark_dirty();
    }

    /// Sets the cone half angle in radians.
    pub fn set_spot_angle(&mut self, angle: f32) {
        self.spot_angle = angle;
        self.uniform.mark_dirty();
    }

    /// Sets the inner cone angle in radians.
    pub fn set_inner_angle(&mut self, angle: f32) {
        self.inner_angle = angle;
        self.uniform.mark_dirty();
    }

    /// Sets the outer cone angle in radians.
    pub fn set_extern_angle(&mut self, angle: f32) {
        self.extern_angle = angle;
        self.uniform.mark_dirty();
    }

    /// Sets the rotation about X and recomputes the direction.
    pub fn set_angle_x(&mut self, angle: f32) {
        self.angles.x = angle;
        self.rotate();
    }

    /// Sets the rotation about Y and recomputes the direction.
    pub fn set_angle_y(&mut self, angle: f32) {
        self.angles.y = angle;
        self.rotate();
    }

    /// Sets the rotation about Z and recomputes the direction.
    pub fn set_angle_z(&mut self, angle: f32) {
        self.angles.z = angle;
        self.rotate();
    }

    /// Sets the intensity multiplier.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
        self.uniform.mark_dirty();
    }

    /// Enables or disables the light.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.uniform.mark_dirty();
    }

    fn rotate(&mut self) {
        let rotation = rotation_yxz(self.angles.x, self.angles.y, self.angles.z);
        self.direction = rotation.transform_vector3(self.base_direction);
        self.uniform.mark_dirty();
    }
}

impl UniformBlock for SpotLight {
    type Raw = SpotLightUniform;
    const BLOCK_NAME: &'static str = SPOT_LIGHT_BLOCK;

    fn to_raw(&self) -> Self::Raw {
        SpotLightUniform {
            position: self.position.extend(1.0).to_array(),
            direction: self.direction.extend(0.0).to_array(),
            color: self.color.to_array(),
            kc: self.attenuation.constant,
            kl: self.attenuation.linear,
            kq: self.attenuation.quadratic,
            range: self.range,
            enabled: flag(self.enabled),
            spot_angle: self.spot_angle,
            inner_angle: self.inner_angle,
            extern_angle: self.extern_angle,
            intensity: self.intensity,
            angle_x: self.angles.x,
            angle_y: self.angles.y,
            angle_z: self.angles.z,
        }
    }

    fn uniform_state(&self) -> &UniformState {
        &self.uniform
    }

    fn uniform_state_mut(&mut self) -> &mut UniformState {
        &mut self.uniform
    }
}
