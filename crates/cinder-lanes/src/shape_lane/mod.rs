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

//! Shape lane - procedural geometry.
//!
//! Every generator emits interleaved `position(3) texcoord(2) normal(3)` rows
//! and 16-bit indices with counter-clockwise front faces. The index layouts
//! are fixed: culling depends on them.

mod cube;
mod cylinder;
mod grid;
mod sphere;

pub use cube::*;
pub use cylinder::*;
pub use grid::*;
pub use sphere::*;

use crate::render_lane::{create_mesh, StaticMesh};
use anyhow::Context;
use cinder_core::math::{Vec2, Vec3};
use cinder_core::renderer::api::VertexFormat;
use cinder_core::GraphicsContext;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Floats per generated vertex row.
pub const SHAPE_STRIDE: usize = 8;

/// Errors raised while generating a shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// The shape needs more vertices than 16-bit indices can address.
    #[error("{shape} needs {count} vertices, more than 16-bit indices can address")]
    TooManyVertices {
        /// The shape being generated.
        shape: &'static str,
        /// The number of vertices it would need.
        count: usize,
    },
    /// A descriptor field is out of range.
    #[error("Invalid {shape} descriptor: {reason}")]
    InvalidParameter {
        /// The shape being generated.
        shape: &'static str,
        /// What is wrong with the descriptor.
        reason: String,
    },
}

/// Interleaved vertices and indices of a generated shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeData {
    /// `position(3) texcoord(2) normal(3)` rows.
    pub vertices: Vec<f32>,
    /// Triangle list indices.
    pub indices: Vec<u16>,
}

impl ShapeData {
    fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices * SHAPE_STRIDE),
            indices: Vec::with_capacity(indices),
        }
    }

    fn push(&mut self, position: Vec3, uv: Vec2, normal: Vec3) {
        self.vertices.extend_from_slice(&[
            position.x, position.y, position.z, uv.x, uv.y, normal.x, normal.y, normal.z,
        ]);
    }

    /// The number of vertex rows.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / SHAPE_STRIDE
    }

    /// The position of vertex `index`.
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * SHAPE_STRIDE..])
    }

    /// The texture coordinate of vertex `index`.
    pub fn uv(&self, index: usize) -> Vec2 {
        Vec2::from_slice(&self.vertices[index * SHAPE_STRIDE + 3..])
    }

    /// The normal of vertex `index`.
    pub fn normal(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[index * SHAPE_STRIDE + 5..])
    }

    /// Uploads the shape as a one-submesh mesh.
    ///
    /// ## Errors
    /// * Any error of the context while creating the GPU objects.
    pub fn into_mesh(self, context: &dyn GraphicsContext) -> anyhow::Result<StaticMesh> {
        create_mesh(
            context,
            &self.vertices,
            &self.indices,
            VertexFormat::position_texcoord_normal(),
        )
        .context("ShapeLane: Could not upload shape")
    }
}

/// A serializable choice of shape and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeDescriptor {
    /// An axis-aligned box.
    Cube(CubeDescriptor),
    /// A UV sphere.
    Sphere(SphereDescriptor),
    /// A flat lattice in the XZ plane.
    Grid(GridDescriptor),
    /// A capped cylinder or cone frustum.
    Cylinder(CylinderDescriptor),
}

impl ShapeDescriptor {
    /// Runs the matching generator.
    ///
    /// ## Errors
    /// * `ShapeError` - The descriptor is out of range.
    pub fn generate(&self) -> Result<ShapeData, ShapeError> {
        match self {
            ShapeDescriptor::Cube(d) => Ok(cube(d)),
            ShapeDescriptor::Sphere(d) => sphere(d),
            ShapeDescriptor::Grid(d) => grid(d),
            ShapeDescriptor::Cylinder(d) => cylinder(d),
        }
    }

    /// Parses a descriptor written in RON, e.g. `Sphere((radio: 2.0))`.
    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).with_context(|| format!("ShapeLane: Invalid shape descriptor '{text}'"))
    }
}

fn check_vertex_count(shape: &'static str, count: usize) -> Result<(), ShapeError> {
    if count > usize::from(u16::MAX) + 1 {
        return Err(ShapeError::TooManyVertices { shape, count });
    }
    Ok(())
}

fn invalid(shape: &'static str, reason: impl Into<String>) -> ShapeError {
    ShapeError::InvalidParameter {
        shape,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_core::renderer::api::BufferTarget;
    use cinder_core::testing::{Call, RecordingContext};

    #[test]
    fn test_descriptor_from_ron() {
        let descriptor =
            ShapeDescriptor::from_ron_str("Sphere((radio: 2.0, stacks: 4, slices: 4))").unwrap();
        let shape = descriptor.generate().unwrap();
        assert_eq!(shape.vertex_count(), 17);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let descriptor = ShapeDescriptor::from_ron_str("Cube((height: 3.0))").unwrap();
        assert_eq!(
            descriptor,
            ShapeDescriptor::Cube(CubeDescriptor {
                height: 3.0,
                ..CubeDescriptor::default()
            })
        );
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let err = ShapeDescriptor::from_ron_str("Torus(())").unwrap_err();
        assert!(err.to_string().starts_with("ShapeLane: Invalid shape descriptor"));
    }

    #[test]
    fn test_error_display() {
        let err = ShapeError::TooManyVertices {
            shape: "grid",
            count: 70_000,
        };
        assert_eq!(
            err.to_string(),
            "grid needs 70000 vertices, more than 16-bit indices can address"
        );
    }

    #[test]
    fn test_into_mesh_uploads_indexed_submesh() {
        let context = RecordingContext::new();
        let mesh = cube(&CubeDescriptor::default()).into_mesh(&context).unwrap();

        assert_eq!(mesh.stride_floats(), 8);
        assert_eq!(mesh.submeshes()[0].vertex_count(), 24);
        assert_eq!(mesh.submeshes()[0].index_count(), 36);
        assert_eq!(
            context.count(|c| matches!(
                c,
                Call::CreateBuffer {
                    target: BufferTarget::Index,
                    len: 72,
                    ..
                }
            )),
            1
        );
    }
}
