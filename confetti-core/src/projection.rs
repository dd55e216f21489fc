//! Perspective projection from camera space to screen space

use nalgebra::Vector3;

/// Vertical field of view in degrees
pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;

/// Depths at or in front of this plane are clamped onto it
pub const NEAR_CLAMP: f32 = -0.1;

/// A projected point; `depth` is the camera-space z after clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenPoint {
    /// Camera-front test. Clamped points sit exactly on the plane and fail it.
    pub fn is_in_front(&self) -> bool {
        self.depth < NEAR_CLAMP
    }
}

/// Project a camera-space point onto a `width` x `height` screen.
///
/// The camera looks down -Z. Points with `z > -0.1` are pushed back onto the
/// near plane instead of being rejected, so the division never blows up.
pub fn project(v: &Vector3<f32>, width: u32, height: u32) -> ScreenPoint {
    let width = width as f32;
    let height = height as f32;
    let half_fov = FIELD_OF_VIEW_DEGREES.to_radians() / 2.0;
    let aspect = width / height;

    let z = v.z.min(NEAR_CLAMP);
    let extent = -z * half_fov.tan();

    ScreenPoint {
        x: (v.x / extent) * width / 2.0 + width / 2.0,
        y: (-v.y / (extent / aspect)) * height / 2.0 + height / 2.0,
        depth: z,
    }
}
