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

//! A free-flying perspective camera.

use crate::math::{degrees_to_radians, Mat4, Vec3};

/// A perspective camera driven by yaw, pitch and accumulated movement.
///
/// Movement helpers only accumulate a velocity. [`Camera::view_matrix`] is the
/// single place where that velocity is applied to the position and cleared, so
/// several movement calls within one frame compose additively.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov_y: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    speed: f32,
    rotation_speed: f32,
    velocity: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

impl Camera {
    /// Creates a camera at the origin looking down -Z.
    ///
    /// - FOV: 60 degrees
    /// - Near plane: 0.1
    /// - Far plane: 1000.0
    /// - Speed: 0.1 units per step, rotation speed 0.005
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: degrees_to_radians(60.0),
            aspect_ratio,
            near: 0.1,
            far: 1000.0,
            speed: 0.1,
            rotation_speed: 0.005,
            velocity: Vec3::ZERO,
        }
    }

    /// Applies the pending velocity, refreshes the basis vectors and returns
    /// the world-to-camera matrix.
    pub fn view_matrix(&mut self) -> Mat4 {
        self.position += self.velocity;

        let camera_to_world = Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_rotation_x(self.pitch);

        self.forward = camera_to_world.transform_vector3(Vec3::NEG_Z);
        self.right = camera_to_world.transform_vector3(Vec3::X);
        self.up = camera_to_world.transform_vector3(Vec3::Y);
        self.velocity = Vec3::ZERO;

        camera_to_world.inverse()
    }

    /// The right-handed perspective projection with a `[-1, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    /// A view matrix looking from the position at the target, +Y up.
    pub fn look_at_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Accumulates movement along the forward axis.
    pub fn move_forward(&mut self, units: f32) {
        self.velocity += self.forward * self.speed * units;
    }

    /// Accumulates movement along the right axis.
    pub fn strafe(&mut self, units: f32) {
        self.velocity += self.right * self.speed * units;
    }

    /// Accumulates movement along world +Y.
    pub fn move_up(&mut self, units: f32) {
        self.velocity.y += units * self.speed;
    }

    /// Turns around the vertical axis immediately, in radians.
    pub fn yaw(&mut self, angle: f32) {
        self.yaw += angle;
    }

    /// Tilts around the right axis immediately, in radians.
    pub fn pitch(&mut self, angle: f32) {
        self.pitch += angle;
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the camera without going through the velocity.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// The look-at target.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Sets the look-at target.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// The forward axis computed by the last [`view_matrix`](Self::view_matrix).
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// The right axis computed by the last [`view_matrix`](Self::view_matrix).
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// The up axis computed by the last [`view_matrix`](Self::view_matrix).
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The pending, not yet applied, movement.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// The vertical field of view in radians.
    pub fn field_of_view(&self) -> f32 {
        self.fov_y
    }

    /// Sets the vertical field of view, in degrees.
    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.fov_y = degrees_to_radians(degrees);
    }

    /// Width over height of the viewport.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Updates the aspect ratio from a viewport size, ignoring a zero height.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// The near clipping distance.
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Sets the near clipping distance.
    pub fn set_near(&mut self, near: f32) {
        self.near = near;
    }

    /// The far clipping distance.
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Sets the far clipping distance.
    pub fn set_far(&mut self, far: f32) {
        self.far = far;
    }

    /// Distance covered per movement unit.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the distance covered per movement unit.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Suggested radians per input unit for yaw and pitch.
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Sets the suggested radians per input unit.
    pub fn set_rotation_speed(&mut self, rotation_speed: f32) {
        self.rotation_speed = rotation_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{EPSILON, FRAC_PI_2};
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new(4.0 / 3.0);
        assert_eq!(camera.position(), Vec3::ZERO);
        assert_eq!(camera.forward(), Vec3::NEG_Z);
        assert_relative_eq!(camera.field_of_view(), 60.0_f32.to_radians());
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 1000.0);
        assert_eq!(camera.speed(), 0.1);
        assert_eq!(camera.rotation_speed(), 0.005);
    }

    #[test]
    fn test_view_matrix_is_stable_without_movement() {
        let mut camera = Camera::default();
        let first = camera.view_matrix();
        let second = camera.view_matrix();
        assert_eq!(first, second);
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    fn test_movement_accumulates_until_flushed() {
        let mut camera = Camera::default();
        camera.move_forward(1.0);
        camera.move_forward(1.0);
        assert_eq!(camera.position(), Vec3::ZERO);

        camera.view_matrix();
        let moved = camera.position();
        assert_relative_eq!(moved.z, -0.2, epsilon = EPSILON);
        assert_relative_eq!(moved.x, 0.0, epsilon = EPSILON);
        assert_eq!(camera.velocity(), Vec3::ZERO);

        camera.view_matrix();
        assert_eq!(camera.position(), moved);
    }

    #[test]
    fn test_strafe_and_move_up() {
        let mut camera = Camera::default();
        camera.strafe(2.0);
        camera.move_up(1.0);
        camera.view_matrix();
        assert_relative_eq!(camera.position().x, 0.2, epsilon = EPSILON);
        assert_relative_eq!(camera.position().y, 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_yaw_rotates_basis_on_next_view() {
        let mut camera = Camera::default();
        camera.yaw(FRAC_PI_2);
        assert_eq!(camera.forward(), Vec3::NEG_Z);
        camera.view_matrix();
        assert_relative_eq!(camera.forward().x, -1.0, epsilon = EPSILON);
        assert_relative_eq!(camera.right().z, -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_view_matrix_is_inverse_of_camera_transform() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        let view = camera.view_matrix();
        let origin = view.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(origin.length(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_field_of_view_takes_degrees() {
        let mut camera = Camera::default();
        camera.set_field_of_view(90.0);
        assert_relative_eq!(camera.field_of_view(), FRAC_PI_2, epsilon = EPSILON);
        camera.resize(800, 0);
        assert_relative_eq!(camera.aspect_ratio(), 16.0 / 9.0);
        camera.resize(800, 400);
        assert_eq!(camera.aspect_ratio(), 2.0);
    }
}
