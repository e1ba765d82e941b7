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

//! Defines the Phong-style material mirrored into the `u_material` block.

use crate::math::Vec4;
use crate::renderer::uniform::{UniformBlock, UniformState};
use bytemuck::{Pod, Zeroable};

/// Block name of the material in the lit shaders.
pub const MATERIAL_BLOCK: &str = "u_material";

/// GPU layout of [`Material`] (96 bytes, std140).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Diffuse RGBA.
    pub diffuse: [f32; 4],
    /// Specular RGBA.
    pub specular: [f32; 4],
    /// Ambient RGBA.
    pub ambient: [f32; 4],
    /// Emissive RGBA.
    pub emissive: [f32; 4],
    /// Specular exponent.
    pub specular_power: f32,
    /// Opacity, `1.0` is opaque.
    pub transparency: f32,
    /// Index of refraction.
    pub optical_density: f32,
    /// Roughness factor.
    pub roughness: f32,
    /// Metalness factor.
    pub metalness: f32,
    /// Fresnel factor.
    pub fresnel: f32,
    /// `1.0` when the material samples a texture.
    pub has_texture: f32,
    /// Padding to a 16-byte multiple.
    pub _padding: f32,
}

/// A flat set of shading parameters for one submesh.
///
/// Texture indices refer to the textures of the owning mesh. Every setter
/// marks the uniform block dirty.
///
/// # Examples
///
/// ```
/// use cinder_core::math::Vec4;
/// use cinder_core::renderer::material::Material;
///
/// let mut brick = Material::named("brick");
/// brick.set_diffuse_color(Vec4::new(0.6, 0.2, 0.1, 1.0));
/// brick.set_specular_power(16.0);
/// brick.set_diffuse_texture_index(Some(0));
/// assert!(brick.has_texture());
/// ```
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    ambient_color: Vec4,
    diffuse_color: Vec4,
    specular_color: Vec4,
    emissive_color: Vec4,
    specular_power: f32,
    transparency: f32,
    optical_density: f32,
    roughness: f32,
    metalness: f32,
    fresnel: f32,
    has_texture: bool,
    diffuse_texture_index: Option<usize>,
    normal_map_index: Option<usize>,
    bump_map_index: Option<usize>,
    uniform: UniformState,
}

impl Default for Material {
    fn default() -> Self {
        let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
        Self {
            name: String::new(),
            ambient_color: black,
            diffuse_color: black,
            specular_color: black,
            emissive_color: black,
            specular_power: 0.0,
            transparency: 1.0,
            optical_density: 1.0,
            roughness: 0.0,
            metalness: 0.0,
            fresnel: 0.0,
            has_texture: false,
            diffuse_texture_index: None,
            normal_map_index: None,
            bump_map_index: None,
            uniform: UniformState::new(),
        }
    }
}

macro_rules! material_setter {
    ($(#[$doc:meta])* $setter:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        pub fn $setter(&mut self, value: $ty) {
            self.$field = value;
            self.uniform.mark_dirty();
        }
    };
}

impl Material {
    /// Creates a black, opaque, untextured material.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default material with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The material name, as declared by `newmtl`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the material.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The ambient color.
    pub fn ambient_color(&self) -> Vec4 {
        self.ambient_color
    }

    /// The diffuse color.
    pub fn diffuse_color(&self) -> Vec4 {
        self.diffuse_color
    }

    /// The specular color.
    pub fn specular_color(&self) -> Vec4 {
        self.specular_color
    }

    /// The emissive color.
    pub fn emissive_color(&self) -> Vec4 {
        self.emissive_color
    }

    /// The specular exponent. Values `<= 1` disable specular highlights.
    pub fn specular_power(&self) -> f32 {
        self.specular_power
    }

    /// The opacity.
    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    /// The index of refraction.
    pub fn optical_density(&self) -> f32 {
        self.optical_density
    }

    /// The roughness factor.
    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// The metalness factor.
    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    /// The fresnel factor.
    pub fn fresnel(&self) -> f32 {
        self.fresnel
    }

    /// Whether the material samples a texture.
    pub fn has_texture(&self) -> bool {
        self.has_texture
    }

    /// Index of the diffuse texture in the owning mesh.
    pub fn diffuse_texture_index(&self) -> Option<usize> {
        self.diffuse_texture_index
    }

    /// Index of the normal map in the owning mesh.
    pub fn normal_map_index(&self) -> Option<usize> {
        self.normal_map_index
    }

    /// Index of the bump map in the owning mesh.
    pub fn bump_map_index(&self) -> Option<usize> {
        self.bump_map_index
    }

    /// The texture indices bound to sequential sampler units, in unit order.
    pub fn texture_slots(&self) -> [Option<usize>; 3] {
        [
            self.diffuse_texture_index,
            self.normal_map_index,
            self.bump_map_index,
        ]
    }

    material_setter!(
        /// Sets the ambient color.
        set_ambient_color, ambient_color: Vec4
    );
    material_setter!(
        /// Sets the diffuse color.
        set_diffuse_color, diffuse_color: Vec4
    );
    material_setter!(
        /// Sets the specular color.
        set_specular_color, specular_color: Vec4
    );
    material_setter!(
        /// Sets the emissive color.
        set_emissive_color, emissive_color: Vec4
    );
    material_setter!(
        /// Sets the specular exponent.
        set_specular_power, specular_power: f32
    );
    material_setter!(
        /// Sets the opacity.
        set_transparency, transparency: f32
    );
    material_setter!(
        /// Sets the index of refraction.
        set_optical_density, optical_density: f32
    );
    material_setter!(
        /// Sets the roughness factor.
        set_roughness, roughness: f32
    );
    material_setter!(
        /// Sets the metalness factor.
        set_metalness, metalness: f32
    );
    material_setter!(
        /// Sets the fresnel factor.
        set_fresnel, fresnel: f32
    );
    material_setter!(
        /// Declares whether the material samples a texture.
        set_has_texture, has_texture: bool
    );
    material_setter!(
        /// Sets the normal map index.
        set_normal_map_index, normal_map_index: Option<usize>
    );
    material_setter!(
        /// Sets the bump map index.
        set_bump_map_index, bump_map_index: Option<usize>
    );

    /// Sets the diffuse texture index. A texture index also turns texturing on.
    pub fn set_diffuse_texture_index(&mut self, index: Option<usize>) {
        self.diffuse_texture_index = index;
        if index.is_some() {
            self.has_texture = true;
        }
        self.uniform.mark_dirty();
    }
}

impl UniformBlock for Material {
    type Raw = MaterialUniform;
    const BLOCK_NAME: &'static str = MATERIAL_BLOCK;

    fn to_raw(&self) -> Self::Raw {
        MaterialUniform {
            diffuse: self.diffuse_color.to_array(),
            specular: self.specular_color.to_array(),
            ambient: self.ambient_color.to_array(),
            emissive: self.emissive_color.to_array(),
            specular_power: self.specular_power,
            transparency: self.transparency,
            optical_density: self.optical_density,
            roughness: self.roughness,
            metalness: self.metalness,
            fresnel: self.fresnel,
            has_texture: if self.has_texture { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }

    fn uniform_state(&self) -> &UniformState {
        &self.uniform
    }

    fn uniform_state_mut(&mut self) -> &mut UniformState {
        &mut self.uniform
    }
}
