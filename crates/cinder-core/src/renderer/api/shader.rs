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

//! Shader stages, program handles and uniform values.

use crate::math::{Mat4, Vec3, Vec4};

/// The programmable stage a shader object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex stage.
    Vertex,
    /// The fragment stage.
    Fragment,
}

/// An opaque handle to a compiled shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub usize);

/// An opaque handle to a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// An opaque handle to the location of a uniform inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocationId(pub usize);

/// A value that can be uploaded to a non-block uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// A signed integer, also used for sampler units.
    Int(i32),
    /// A single float.
    Float(f32),
    /// A three component vector.
    Vec3(Vec3),
    /// A four component vector.
    Vec4(Vec4),
    /// A column-major 4x4 matrix.
    Mat4(Mat4),
}
