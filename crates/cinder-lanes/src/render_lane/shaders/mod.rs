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

//! Built-in GLSL ES 3.00 shader sources.
//!
//! Each pipeline variant pairs one vertex and one fragment source. Attribute
//! names follow the `in_*` convention of [`cinder_core::renderer::api::VertexFormat`]
//! and the matrices are always `u_mProj`, `u_mView` and `u_mModel`.
//!
//! # Available Shaders
//!
//! - [`SIMPLE_VERT`] / [`SIMPLE_FRAG`] - Flat color from `u_color`
//! - [`TEXTURE_VERT`] / [`TEXTURE_FRAG`] - Unlit sampling of `u_sampler0`
//! - [`STANDARD_VERT`] / [`STANDARD_FRAG`] - Interpolated vertex colors
//! - [`PHONG_VERT`] / [`PHONG_FRAG`] - Directional, point and spot lighting from uniform blocks

/// Vertex stage of the flat color pipeline.
pub const SIMPLE_VERT: &str = include_str!("simple.vert");

/// Fragment stage of the flat color pipeline.
pub const SIMPLE_FRAG: &str = include_str!("simple.frag");

/// Vertex stage of the unlit textured pipeline.
pub const TEXTURE_VERT: &str = include_str!("texture.vert");

/// Fragment stage of the unlit textured pipeline.
pub const TEXTURE_FRAG: &str = include_str!("texture.frag");

/// Vertex stage of the vertex color pipeline.
pub const STANDARD_VERT: &str = include_str!("standard.vert");

/// Fragment stage of the vertex color pipeline.
pub const STANDARD_FRAG: &str = include_str!("standard.frag");

/// Vertex stage of the Phong pipeline. Outputs world-space position and normal.
pub const PHONG_VERT: &str = include_str!("phong.vert");

/// Fragment stage of the Phong pipeline.
///
/// Sums the ambient, diffuse and specular terms of every enabled light.
/// Specular is skipped for exponents of 1 or less. Point and spot terms fade
/// with `1 / (kc + kl·d + kq·d²)` and vanish beyond the light range.
pub const PHONG_FRAG: &str = include_str!("phong.frag");
