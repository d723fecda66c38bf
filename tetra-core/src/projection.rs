/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;

/// A point in normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ndc {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Ndc {
    /// Depth strictly inside the clip volume. `z == ±1` counts as outside.
    pub fn is_depth_visible(&self) -> bool {
        self.z > -1.0 && self.z < 1.0
    }

    /// Map to pixel coordinates with the origin at the top-left corner
    pub fn to_screen(&self, width: f32, height: f32) -> (f32, f32) {
        ((self.x + 1.0) * 0.5 * width, (1.0 - self.y) * 0.5 * height)
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Matrix4<f32>,
}

impl Camera {
    /// Perspective camera from configuration
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: Point3::from(config.position),
            target: Point3::from(config.target),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Recompute the projection after changing fov, aspect or clip planes
    pub fn update_projection_matrix(&mut self) {
        self.projection = Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    /// Project a world-space point to normalized device coordinates.
    ///
    /// Returns `None` when the clip-space `w` is too close to zero to divide by.
    pub fn project(&self, point: &Point3<f32>) -> Option<Ndc> {
        let clip = self.view_projection() * point.to_homogeneous();

        if clip.w.abs() < 1e-6 {
            return None;
        }

        Some(Ndc {
            x: clip.x / clip.w,
            y: clip.y / clip.w,
            z: clip.z / clip.w,
        })
    }

    /// Project a 3D point to 2D screen space.
    ///
    /// Returns `(x, y, depth)` for points inside the clip volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let world = model_matrix.transform_point(point);
        let ndc = self.project(&world)?;

        // Clip test
        if ndc.x < -1.0 || ndc.x > 1.0 || ndc.y < -1.0 || ndc.y > 1.0 || !ndc.is_depth_visible() {
            return None;
        }

        let (screen_x, screen_y) = ndc.to_screen(width as f32, height as f32);
        Some((screen_x, screen_y, ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }

    #[test]
    fn test_camera_creation() {
        let camera = camera();
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = camera();
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_from_config() {
        let camera = Camera::from_config(&CameraConfig::default(), 2.0);
        assert!((camera.fov - 75f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_target_projects_to_centre() {
        let camera = camera();
        let ndc = camera.project(&Point3::origin()).unwrap();
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.is_depth_visible());
        let (x, y) = ndc.to_screen(800.0, 600.0);
        assert!((x - 400.0).abs() < 1e-3 && (y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_points_behind_camera_fall_outside_depth_range() {
        let camera = camera();
        let ndc = camera.project(&Point3::new(0.0, 0.0, 10.0)).unwrap();
        assert!(!ndc.is_depth_visible());
    }

    #[test]
    fn test_near_and_far_planes_map_to_depth_bounds() {
        let camera = camera();
        let near = camera.project(&Point3::new(0.0, 0.0, 5.0 - camera.near)).unwrap();
        let far = camera.project(&Point3::new(0.0, 0.0, 5.0 - camera.far)).unwrap();
        assert!((near.z + 1.0).abs() < 1e-3);
        assert!((far.z - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_depth_boundary_is_exclusive() {
        let at = |z| Ndc { x: 0.0, y: 0.0, z };
        assert!(!at(1.0).is_depth_visible());
        assert!(!at(-1.0).is_depth_visible());
        assert!(at(0.999).is_depth_visible());
        assert!(at(-0.999).is_depth_visible());
    }

    #[test]
    fn test_screen_mapping_flips_y() {
        let top_left = Ndc { x: -1.0, y: 1.0, z: 0.0 };
        assert_eq!(top_left.to_screen(640.0, 480.0), (0.0, 0.0));
        let bottom_right = Ndc { x: 1.0, y: -1.0, z: 0.0 };
        assert_eq!(bottom_right.to_screen(640.0, 480.0), (640.0, 480.0));
    }

    #[test]
    fn test_set_aspect_updates_projection() {
        let mut camera = camera();
        let before = camera.projection;
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect, 2.0);
        assert!((camera.projection - before).norm() > 0.0);
    }
}
