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
use cinder_core::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Parameters of a regular lattice in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDescriptor {
    /// Vertices along Z. At least 2.
    pub num_vert_rows: u32,
    /// Vertices along X. At least 2.
    pub num_vert_cols: u32,
    /// Cell size; `x` spaces columns and `z` spaces rows, `y` is unused.
    pub delta: Vec3,
    /// Center of the grid. `y` is the height of the plane.
    pub position: Vec3,
    /// Texture coordinate step per cell.
    pub tex_scale: f32,
}

impl Default for GridDescriptor {
    fn default() -> Self {
        Self {
            num_vert_rows: 10,
            num_vert_cols: 10,
            delta: Vec3::ONE,
            position: Vec3::ZERO,
            tex_scale: 1.0,
        }
    }
}

/// Builds a flat grid facing +Y.
///
/// Rows start at the far edge (`+Z`) and advance towards `-Z`; columns start
/// at `-X`. Every cell is the two triangles `(a, b, c)` and `(c, b, d)` where
/// `a, b` are on the current row and `c, d` on the next.
///
/// ## Errors
/// * `ShapeError::InvalidParameter` - Fewer than 2 rows or columns.
/// * `ShapeError::TooManyVertices` - The grid does not fit 16-bit indices.
pub fn grid(descriptor: &GridDescriptor) -> Result<ShapeData, ShapeError> {
    let rows = descriptor.num_vert_rows as usize;
    let cols = descriptor.num_vert_cols as usize;
    if rows < 2 || cols < 2 {
        return Err(invalid(
            "grid",
            format!("needs at least 2x2 vertices, got {rows}x{cols}"),
        ));
    }
    check_vertex_count("grid", rows * cols)?;

    let cell_rows = rows - 1;
    let cell_cols = cols - 1;
    let width = cell_cols as f32 * descriptor.delta.x;
    let depth = cell_rows as f32 * descriptor.delta.z;
    let x0 = descriptor.position.x - width * 0.5;
    let z0 = descriptor.position.z + depth * 0.5;

    let mut shape = ShapeData::with_capacity(rows * cols, cell_rows * cell_cols * 6);
    for i in 0..rows {
        for j in 0..cols {
            let position = Vec3::new(
                x0 + j as f32 * descriptor.delta.x,
                descriptor.position.y,
                z0 - i as f32 * descriptor.delta.z,
            );
            let uv = Vec2::new(j as f32, i as f32) * descriptor.tex_scale;
            shape.push(position, uv, Vec3::Y);
        }
    }

    let cols = cols as u16;
    for i in 0..cell_rows as u16 {
        for j in 0..cell_cols as u16 {
            let a = i * cols + j;
            let c = (i + 1) * cols + j;
            shape
                .indices
                .extend_from_slice(&[a, a + 1, c, c, a + 1, c + 1]);
        }
    }

    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quad() {
        let shape = grid(&GridDescriptor {
            num_vert_rows: 2,
            num_vert_cols: 2,
            ..GridDescriptor::default()
        })
        .unwrap();

        assert_eq!(shape.vertex_count(), 4);
        assert_eq!(shape.indices, vec![0, 1, 2, 2, 1, 3]);
        for vertex in 0..4 {
            assert_eq!(shape.normal(vertex), Vec3::Y);
        }
    }

    #[test]
    fn test_centered_on_position() {
        let shape = grid(&GridDescriptor {
            num_vert_rows: 3,
            num_vert_cols: 5,
            delta: Vec3::new(2.0, 0.0, 1.0),
            position: Vec3::new(10.0, -1.0, 4.0),
            tex_scale: 0.5,
        })
        .unwrap();

        assert_eq!(shape.position(0), Vec3::new(6.0, -1.0, 5.0));
        assert_eq!(shape.position(14), Vec3::new(14.0, -1.0, 3.0));
        assert_eq!(shape.uv(14), Vec2::new(2.0, 1.0));
        assert_eq!(shape.indices.len(), 2 * 4 * 6);
    }

    #[test]
    fn test_winding_faces_up() {
        let shape = grid(&GridDescriptor::default()).unwrap();
        for tri in shape.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| shape.position(i as usize));
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn test_rejects_single_row() {
        let line = GridDescriptor {
            num_vert_rows: 1,
            ..GridDescriptor::default()
        };
        assert!(grid(&line).is_err());
    }
}
