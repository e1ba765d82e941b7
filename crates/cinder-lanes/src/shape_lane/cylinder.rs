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

use super::{check_vertex_count, invalid, ShapeData, ShapeError};
use cinder_core::math::{Vec2, Vec3, TAU};
use serde::{Deserialize, Serialize};

/// Parameters of a capped cylinder along Y, centered at the origin.
///
/// Different radii give a cone frustum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderDescriptor {
    /// Divisions around the axis. At least 3.
    pub slices: u32,
    /// Divisions along the axis. At least 1.
    pub stacks: u32,
    /// Radius at `y = -height / 2`.
    pub bottom_radio: f32,
    /// Radius at `y = height / 2`.
    pub top_radio: f32,
    /// Extent along Y. Must be positive.
    pub height: f32,
}

impl Default for CylinderDescriptor {
    fn default() -> Self {
        Self {
            slices: 16,
            stacks: 1,
            bottom_radio: 0.5,
            top_radio: 0.5,
            height: 1.0,
        }
    }
}

/// Builds the side rings bottom to top, then the top cap, then the bottom cap.
///
/// The side has `stacks + 1` rings of `slices + 1` vertices. Each cap
/// duplicates its ring with a flat normal and planar texture coordinates, and
/// adds a center vertex after the ring.
///
/// ## Errors
/// * `ShapeError::InvalidParameter` - Fewer than 3 slices or 1 stack, or a non-positive height.
/// * `ShapeError::TooManyVertices` - The cylinder does not fit 16-bit indices.
pub fn cylinder(descriptor: &CylinderDescriptor) -> Result<ShapeData, ShapeError> {
    let CylinderDescriptor {
        slices,
        stacks,
        bottom_radio,
        top_radio,
        height,
    } = *descriptor;
    if slices < 3 {
        return Err(invalid("cylinder", format!("slices must be at least 3, got {slices}")));
    }
    if stacks < 1 {
        return Err(invalid("cylinder", "stacks must be at least 1"));
    }
    if height <= 0.0 {
        return Err(invalid("cylinder", format!("height must be positive, got {height}")));
    }

    let ring_vertex_count = slices as usize + 1;
    let side_vertices = (stacks as usize + 1) * ring_vertex_count;
    let vertex_count = side_vertices + 2 * (ring_vertex_count + 1);
    check_vertex_count("cylinder", vertex_count)?;

    let index_count = 6 * slices as usize * stacks as usize + 6 * slices as usize;
    let mut shape = ShapeData::with_capacity(vertex_count, index_count);

    let stack_height = height / stacks as f32;
    let radio_step = (top_radio - bottom_radio) / stacks as f32;
    let theta = TAU / slices as f32;
    let dr = bottom_radio - top_radio;

    for i in 0..=stacks {
        let y = -0.5 * height + i as f32 * stack_height;
        let r = bottom_radio + i as f32 * radio_step;
        for j in 0..=slices {
            let (s, c) = (j as f32 * theta).sin_cos();

            // Tangent along the ring and bitangent down the slant, which
            // follows the taper of the radius.
            let tangent = Vec3::new(-s, 0.0, c);
            let bitangent = Vec3::new(dr * c, -height, dr * s);
            let normal = tangent.cross(bitangent).normalize_or_zero();

            let uv = Vec2::new(j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32);
            shape.push(Vec3::new(r * c, y, r * s), uv, normal);
        }
    }

    let ring = ring_vertex_count as u16;
    for i in 0..stacks as u16 {
        for j in 0..slices as u16 {
            let lower = i * ring + j;
            let upper = (i + 1) * ring + j;
            shape
                .indices
                .extend_from_slice(&[lower, upper, upper + 1, lower, upper + 1, lower + 1]);
        }
    }

    push_cap(&mut shape, descriptor, true);
    push_cap(&mut shape, descriptor, false);

    Ok(shape)
}

fn push_cap(shape: &mut ShapeData, descriptor: &CylinderDescriptor, top: bool) {
    let (y, radio, normal) = if top {
        (0.5 * descriptor.height, descriptor.top_radio, Vec3::Y)
    } else {
        (-0.5 * descriptor.height, descriptor.bottom_radio, Vec3::NEG_Y)
    };
    let theta = TAU / descriptor.slices as f32;
    let base = shape.vertex_count() as u16;

    for i in 0..=descriptor.slices {
        let (s, c) = (i as f32 * theta).sin_cos();
        let x = radio * c;
        let z = radio * s;
        // Scaled by the height so the cap texel density tracks the side.
        let uv = Vec2::new(x / descriptor.height + 0.5, z / descriptor.height + 0.5);
        shape.push(Vec3::new(x, y, z), uv, normal);
    }

    let center = shape.vertex_count() as u16;
    shape.push(Vec3::new(0.0, y, 0.0), Vec2::splat(0.5), normal);

    for i in 0..descriptor.slices as u16 {
        let fan = if top {
            [center, base + i + 1, base + i]
        } else {
            [center, base + i, base + i + 1]
        };
        shape.indices.extend_from_slice(&fan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_counts() {
        let shape = cylinder(&CylinderDescriptor {
            slices: 8,
            stacks: 2,
            ..CylinderDescriptor::default()
        })
        .unwrap();
        assert_eq!(shape.vertex_count(), 3 * 9 + 2 * 10);
        assert_eq!(shape.indices.len(), 6 * 8 * 2 + 2 * 3 * 8);
        let last = shape.vertex_count() as u16;
        assert!(shape.indices.iter().all(|&i| i < last));
    }

    #[test]
    fn test_straight_side_normals_are_radial() {
        let descriptor = CylinderDescriptor {
            slices: 12,
            stacks: 3,
            bottom_radio: 2.0,
            top_radio: 2.0,
            height: 4.0,
        };
        let shape = cylinder(&descriptor).unwrap();
        let side = 4 * 13;
        for vertex in 0..side {
            let normal = shape.normal(vertex);
            let position = shape.position(vertex);
            assert_abs_diff_eq!(normal.y, 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(normal.length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(normal.x, position.x / 2.0, epsilon = 1e-5);
            assert_abs_diff_eq!(normal.z, position.z / 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cone_normals_tilt_up() {
        let shape = cylinder(&CylinderDescriptor {
            bottom_radio: 1.0,
            top_radio: 0.0,
            ..CylinderDescriptor::default()
        })
        .unwrap();
        assert!(shape.normal(0).y > 0.0);
    }

    #[test]
    fn test_caps_face_outward() {
        let descriptor = CylinderDescriptor::default();
        let shape = cylinder(&descriptor).unwrap();
        let side_indices = 6 * 16;
        let top = &shape.indices[side_indices..side_indices + 3];
        let bottom = &shape.indices[side_indices + 48..side_indices + 51];

        let normal_of = |tri: &[u16]| {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| shape.position(i as usize));
            (b - a).cross(c - a)
        };
        assert!(normal_of(top).y > 0.0);
        assert!(normal_of(bottom).y < 0.0);
        assert_eq!(shape.uv(top[0] as usize), Vec2::splat(0.5));
    }

    #[test]
    fn test_rejects_flat_cylinder() {
        let flat = CylinderDescriptor {
            height: 0.0,
            ..CylinderDescriptor::default()
        };
        assert!(matches!(
            cylinder(&flat),
            Err(ShapeError::InvalidParameter { shape: "cylinder", .. })
        ));
    }
}
