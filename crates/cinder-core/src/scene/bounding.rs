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

//! Bounding volumes attached to submeshes.

use crate::math::{min_max, Vec3};

/// A sphere derived from an axis-aligned extent.
///
/// The center is the midpoint of the extent. The radius is the mean of the
/// three half extents, which is cheaper than the enclosing sphere (half the
/// diagonal) and smaller than it for anything but a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBounding {
    min: Vec3,
    max: Vec3,
    center: Vec3,
    radius: f32,
}

impl SphereBounding {
    /// Builds the sphere of an extent. The corners are reordered componentwise
    /// so that `min <= max` always holds.
    pub fn from_extents(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let center = (min + max) / 2.0;
        let half = (max - center).abs();
        Self {
            min,
            max,
            center,
            radius: (half.x + half.y + half.z) / 3.0,
        }
    }

    /// Builds the sphere of the extent of a point cloud, `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        min_max(points).map(|(min, max)| Self::from_extents(min, max))
    }

    /// The minimum corner of the source extent.
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// The maximum corner of the source extent.
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// The sphere center.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// The sphere radius, never negative.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Overrides the radius. Negative values are clamped to zero.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }
}

/// The bounding volume of a submesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingVolume {
    /// A [`SphereBounding`].
    Sphere(SphereBounding),
}

impl BoundingVolume {
    /// Shorthand for a sphere built from an extent.
    pub fn sphere(min: Vec3, max: Vec3) -> Self {
        BoundingVolume::Sphere(SphereBounding::from_extents(min, max))
    }

    /// The center of the volume.
    pub fn position(&self) -> Vec3 {
        match self {
            BoundingVolume::Sphere(sphere) => sphere.center(),
        }
    }

    /// The minimum corner of the source extent.
    pub fn min(&self) -> Vec3 {
        match self {
            BoundingVolume::Sphere(sphere) => sphere.min(),
        }
    }

    /// The maximum corner of the source extent.
    pub fn max(&self) -> Vec3 {
        match self {
            BoundingVolume::Sphere(sphere) => sphere.max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_cube_sphere() {
        let sphere = SphereBounding::from_extents(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(sphere.center(), Vec3::ZERO);
        assert_relative_eq!(sphere.radius(), 1.0);
    }

    #[test]
    fn test_radius_is_mean_of_half_extents_not_half_diagonal() {
        let sphere = SphereBounding::from_extents(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(sphere.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(sphere.radius(), 2.0);
        let half_diagonal = Vec3::new(1.0, 2.0, 3.0).length();
        assert!(sphere.radius() < half_diagonal);
    }

    #[test]
    fn test_swapped_corners_are_reordered() {
        let volume = BoundingVolume::sphere(Vec3::splat(1.0), Vec3::splat(-1.0));
        assert_eq!(volume.min(), Vec3::splat(-1.0));
        assert_eq!(volume.max(), Vec3::splat(1.0));
        assert_eq!(volume.position(), Vec3::ZERO);
    }

    #[test]
    fn test_from_points() {
        assert!(SphereBounding::from_points(std::iter::empty()).is_none());
        let sphere = SphereBounding::from_points([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 2.0),
        ])
        .unwrap();
        assert_eq!(sphere.center(), Vec3::new(1.0, 1.0, 1.0));
        assert!(sphere.radius() >= 0.0);
    }
}
