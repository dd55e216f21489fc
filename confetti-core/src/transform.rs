//! Model transform and axis rotations

use nalgebra::{Rotation3, Vector3};

/// Fixed model offset: the mesh sits five units in front of the camera
pub const MODEL_TRANSLATION: [f32; 3] = [0.0, 0.0, -5.0];

/// Rotate `v` by `angle` radians about the X axis (right-handed)
pub fn rotate_about_x(v: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle) * v
}

/// Rotate `v` by `angle` radians about the Y axis (right-handed)
pub fn rotate_about_y(v: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * v
}

/// Live model transform driven by pointer input and idle spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub scale: f32,
    pub translation: Vector3<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            scale: 1.0,
            translation: Vector3::from(MODEL_TRANSLATION),
        }
    }

    /// Map a model-space point into camera space.
    ///
    /// Order is scale, rotate about X, rotate about Y, translate.
    pub fn apply(&self, v: &Vector3<f32>) -> Vector3<f32> {
        let scaled = v * self.scale;
        let rotated = rotate_about_y(&rotate_about_x(&scaled, self.rotation_x), self.rotation_y);
        rotated + self.translation
    }

    /// Add `about_x` radians to the X-axis rotation and `about_y` to the Y-axis one
    pub fn rotate(&mut self, about_x: f32, about_y: f32) {
        self.rotation_x += about_x;
        self.rotation_y += about_y;
    }

    pub fn zoom(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Back to the initial orientation and scale; translation is untouched
    pub fn reset(&mut self) {
        self.rotation_x = 0.0;
        self.rotation_y = 0.0;
        self.scale = 1.0;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
