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

use super::ShapeData;
use cinder_core::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Dimensions of an axis-aligned box centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeDescriptor {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub depth: f32,
}

impl Default for CubeDescriptor {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

/// Builds a box with 4 unshared vertices per face, so each face keeps its own
/// normal and texture coordinates.
///
/// Faces are emitted front, right, back, left, top, bottom. Each face is two
/// triangles `(0, 1, 2)` and `(0, 2, 3)` over its four corners.
pub fn cube(descriptor: &CubeDescriptor) -> ShapeData {
    let w = 0.5 * descriptor.width;
    let h = 0.5 * descriptor.height;
    let d = 0.5 * descriptor.depth;

    // Corners in face order, with the outward normal of each face.
    let faces: [([Vec3; 4], Vec3); 6] = [
        (
            [
                Vec3::new(-w, -h, d),
                Vec3::new(w, -h, d),
                Vec3::new(w, h, d),
                Vec3::new(-w, h, d),
            ],
            Vec3::Z,
        ),
        (
            [
                Vec3::new(w, -h, d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, h, d),
            ],
            Vec3::X,
        ),
        (
            [
                Vec3::new(w, -h, -d),
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, h, -d),
                Vec3::new(w, h, -d),
            ],
            Vec3::NEG_Z,
        ),
        (
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, -h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, h, -d),
            ],
            Vec3::NEG_X,
        ),
        (
            [
                Vec3::new(-w, h, d),
                Vec3::new(w, h, d),
                Vec3::new(w, h, -d),
                Vec3::new(-w, h, -d),
            ],
            Vec3::Y,
        ),
        (
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, -h, d),
                Vec3::new(-w, -h, d),
            ],
            Vec3::NEG_Y,
        ),
    ];
    let uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ];

    let mut shape = ShapeData::with_capacity(24, 36);
    for (face, (corners, normal)) in faces.iter().enumerate() {
        for (corner, uv) in corners.iter().zip(uvs) {
            shape.push(*corner, uv, *normal);
        }
        let base = (face * 4) as u16;
        shape
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_2() -> ShapeData {
        cube(&CubeDescriptor {
            width: 2.0,
            height: 2.0,
            depth: 2.0,
        })
    }

    #[test]
    fn test_counts() {
        let shape = cube_2();
        assert_eq!(shape.vertex_count(), 24);
        assert_eq!(shape.indices.len(), 36);
    }

    #[test]
    fn test_face_normals_are_cardinal_and_shared_per_face() {
        let shape = cube_2();
        for face in 0..6 {
            let normal = shape.normal(face * 4);
            let axes = normal.to_array().iter().filter(|c| c.abs() == 1.0).count();
            let zeros = normal.to_array().iter().filter(|c| **c == 0.0).count();
            assert_eq!((axes, zeros), (1, 2), "face {face} normal {normal}");
            for corner in 1..4 {
                assert_eq!(shape.normal(face * 4 + corner), normal);
            }
        }
    }

    #[test]
    fn test_positions_lie_on_their_face() {
        let shape = cube_2();
        for vertex in 0..24 {
            let normal = shape.normal(vertex);
            assert_eq!(shape.position(vertex).dot(normal), 1.0);
        }
    }

    #[test]
    fn test_face_corners_are_distinct() {
        let shape = cube_2();
        for face in 0..6 {
            for a in 0..4 {
                for b in (a + 1)..4 {
                    assert_ne!(shape.position(face * 4 + a), shape.position(face * 4 + b));
                }
            }
        }
    }

    #[test]
    fn test_front_face_winding_faces_outward() {
        let shape = cube_2();
        let [a, b, c] = [0, 1, 2].map(|i| shape.position(shape.indices[i] as usize));
        let n = (b - a).cross(c - a).normalize();
        assert_eq!(n, Vec3::Z);
    }
}
