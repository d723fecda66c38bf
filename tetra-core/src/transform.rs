/// Rotation state and transformation matrices
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

/// Object orientation as Euler angles (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    /// Tilt about the X axis
    pub x: f32,
    /// Spin about the Y axis
    pub y: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Orientation with XYZ Euler order: the X rotation is applied last
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.y)
    }

    /// Rotate a point about the origin by this orientation
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        self.rotation() * point
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        rotation.rotation().to_homogeneous()
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_state() {
        let state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(RotationState::new(0.1, 0.2), RotationState { x: 0.1, y: 0.2 });
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_y_then_x_order() {
        // Spin a quarter turn about Y: +X goes to -Z. Then tilt a quarter
        // turn about X: -Z goes to +Y.
        let rotation = RotationState::new(FRAC_PI_2, FRAC_PI_2);
        let moved = rotation.apply(&Point3::new(1.0, 0.0, 0.0));
        assert!((moved - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_matrix_matches_apply() {
        let rotation = RotationState::new(0.7, -1.3);
        let point = Point3::new(1.0, -1.0, 1.0);
        let via_matrix = Transform::rotation_matrix(&rotation).transform_point(&point);
        assert!((via_matrix - rotation.apply(&point)).norm() < 1e-5);
    }
}
