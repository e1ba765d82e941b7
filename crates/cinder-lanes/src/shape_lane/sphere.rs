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
use cinder_core::math::{Vec2, Vec3, PI, TAU};
use serde::{Deserialize, Serialize};

/// Parameters of a UV sphere centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereDescriptor {
    /// Radius.
    pub radio: f32,
    /// Latitude divisions, pole to pole. At least 2.
    pub stacks: u32,
    /// Longitude divisions. At least 3.
    pub slices: u32,
}

impl Default for SphereDescriptor {
    fn default() -> Self {
        Self {
            radio: 1.0,
            stacks: 16,
            slices: 16,
        }
    }
}

/// Builds a pole-to-pole sphere.
///
/// Vertex order is the north pole, `stacks - 1` rings of `slices + 1`
/// vertices from north to south (the seam vertex is duplicated with
/// `u = 1`), then the south pole. Indices are a fan around the north pole,
/// two triangles per quad between rings, then a fan around the south pole.
///
/// ## Errors
/// * `ShapeError::InvalidParameter` - Fewer than 2 stacks or 3 slices, or a non-positive radius.
/// * `ShapeError::TooManyVertices` - The sphere does not fit 16-bit indices.
pub fn sphere(descriptor: &SphereDescriptor) -> Result<ShapeData, ShapeError> {
    let SphereDescriptor {
        radio,
        stacks,
        slices,
    } = *descriptor;
    if radio <= 0.0 {
        return Err(invalid("sphere", format!("radius must be positive, got {radio}")));
    }
    if stacks < 2 {
        return Err(invalid("sphere", format!("stacks must be at least 2, got {stacks}")));
    }
    if slices < 3 {
        return Err(invalid("sphere", format!("slices must be at least 3, got {slices}")));
    }
    let ring_vertex_count = slices as usize + 1;
    let vertex_count = (stacks as usize - 1) * ring_vertex_count + 2;
    check_vertex_count("sphere", vertex_count)?;

    let index_count = 6 * slices as usize * (stacks as usize - 1);
    let mut shape = ShapeData::with_capacity(vertex_count, index_count);

    shape.push(Vec3::new(0.0, radio, 0.0), Vec2::ZERO, Vec3::Y);

    let phi_step = PI / stacks as f32;
    let theta_step = TAU / slices as f32;
    for i in 1..stacks {
        let phi = i as f32 * phi_step;
        for j in 0..=slices {
            let theta = j as f32 * theta_step;
            let position = Vec3::new(
                radio * phi.sin() * theta.cos(),
                radio * phi.cos(),
                radio * phi.sin() * theta.sin(),
            );
            let uv = Vec2::new(theta / TAU, phi / PI);
            shape.push(position, uv, position.normalize_or_zero());
        }
    }

    shape.push(Vec3::new(0.0, -radio, 0.0), Vec2::new(0.0, 1.0), Vec3::NEG_Y);

    let slices = slices as u16;
    let ring = ring_vertex_count as u16;

    for i in 1..=slices {
        shape.indices.extend_from_slice(&[0, i + 1, i]);
    }

    let base = 1u16;
    for i in 0..(stacks as u16 - 2) {
        for j in 0..slices {
            let top = base + i * ring + j;
            let bottom = base + (i + 1) * ring + j;
            shape
                .indices
                .extend_from_slice(&[top, top + 1, bottom, bottom, top + 1, bottom + 1]);
        }
    }

    let south_pole = (vertex_count - 1) as u16;
    let base = south_pole - ring;
    for i in 0..slices {
        shape
            .indices
            .extend_from_slice(&[south_pole, base + i, base + i + 1]);
    }

    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small() -> ShapeData {
        sphere(&SphereDescriptor {
            radio: 2.0,
            stacks: 4,
            slices: 4,
        })
        .unwrap()
    }

    #[test]
    fn test_vertex_count() {
        assert_eq!(small().vertex_count(), 3 * 5 + 2);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let shape = small();
        for vertex in 0..shape.vertex_count() {
            assert_relative_eq!(shape.normal(vertex).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_poles_and_index_range() {
        let shape = small();
        let last = shape.vertex_count() - 1;
        assert_eq!(shape.position(0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(shape.position(last), Vec3::new(0.0, -2.0, 0.0));
        assert!(shape.indices.iter().all(|&i| (i as usize) <= last));
        assert_eq!(shape.indices.len(), 6 * 4 * 3);
    }

    #[test]
    fn test_south_fan_uses_last_vertex() {
        let shape = small();
        let last = (shape.vertex_count() - 1) as u16;
        let fan = &shape.indices[shape.indices.len() - 12..];
        assert!(fan.chunks(3).all(|tri| tri[0] == last));
        // Last ring starts at 1 + 2 * 5.
        assert_eq!(&fan[..3], &[last, 11, 12]);
    }

    #[test]
    fn test_seam_is_duplicated_with_distinct_u() {
        let shape = small();
        let first = 1;
        let seam = first + 4;
        assert_relative_eq!(shape.position(first).x, shape.position(seam).x, epsilon = 1e-5);
        assert_relative_eq!(shape.position(first).z, shape.position(seam).z, epsilon = 1e-5);
        assert_eq!(shape.uv(first).x, 0.0);
        assert_relative_eq!(shape.uv(seam).x, 1.0);
    }

    #[test]
    fn test_rejects_degenerate_descriptors() {
        let flat = SphereDescriptor {
            stacks: 1,
            ..SphereDescriptor::default()
        };
        assert!(matches!(sphere(&flat), Err(ShapeError::InvalidParameter { .. })));

        for radio in [0.0, -1.0] {
            let collapsed = SphereDescriptor {
                radio,
                ..SphereDescriptor::default()
            };
            assert!(matches!(sphere(&collapsed), Err(ShapeError::InvalidParameter { .. })));
        }

        let huge = SphereDescriptor {
            stacks: 512,
            slices: 512,
            ..SphereDescriptor::default()
        };
        assert!(matches!(sphere(&huge), Err(ShapeError::TooManyVertices { .. })));
    }
}
