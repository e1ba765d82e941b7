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

//! Mathematics primitives used across the engine.
//!
//! Linear algebra comes from [`glam`]; this module re-exports the types the
//! engine uses and adds the few helpers the scene code shares, such as the
//! Y·X·Z Euler composition used by meshes, cameras and spot lights.
//!
//! All angular functions operate in **radians** unless explicitly specified
//! otherwise (e.g. [`degrees_to_radians`]).

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

pub mod color;

pub use glam::{Mat4, Vec2, Vec3, Vec4};

pub use self::color::{hex_to_rgb, rgb_to_hex, ColorParseError};

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use cinder_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
///
/// # Examples
///
/// ```
/// use cinder_core::math::{radians_to_degrees, PI};
/// assert_eq!(radians_to_degrees(PI), 180.0);
/// ```
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Builds the rotation `Ry(y) · Rx(x) · Rz(z)`.
///
/// This is the rotation order shared by mesh model matrices, spot light
/// direction updates and (without the Z term) the camera.
#[inline]
pub fn rotation_yxz(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_rotation_y(y) * Mat4::from_rotation_x(x) * Mat4::from_rotation_z(z)
}

/// Returns the componentwise minimum and maximum of a list of points.
///
/// Returns `None` for an empty input.
pub fn min_max(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, Vec3)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_conversions() {
        assert_relative_eq!(degrees_to_radians(90.0), FRAC_PI_2, epsilon = EPSILON);
        assert_relative_eq!(radians_to_degrees(FRAC_PI_2), 90.0, epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_yxz_matches_single_axis_rotations() {
        let only_y = rotation_yxz(0.0, FRAC_PI_2, 0.0);
        let forward = only_y.transform_vector3(Vec3::NEG_Z);
        assert_relative_eq!(forward.x, -1.0, epsilon = EPSILON);
        assert_relative_eq!(forward.z, 0.0, epsilon = EPSILON);

        let only_x = rotation_yxz(FRAC_PI_2, 0.0, 0.0);
        let up = only_x.transform_vector3(Vec3::Y);
        assert_relative_eq!(up.z, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_min_max() {
        assert!(min_max(std::iter::empty()).is_none());
        let (min, max) = min_max([
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 5.0, 0.0),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(max, Vec3::new(1.0, 5.0, 3.0));
    }
}
