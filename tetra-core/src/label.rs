/// Screen placement of the vertex labels
use nalgebra::Point3;

use crate::projection::Camera;
use crate::viewport::Viewport;

/// Where one label goes this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Pixels from the left edge of the viewport
    pub x: f32,
    /// Pixels from the top edge of the viewport
    pub y: f32,
    pub visible: bool,
}

impl LabelPlacement {
    pub const HIDDEN: LabelPlacement = LabelPlacement {
        x: 0.0,
        y: 0.0,
        visible: false,
    };

    pub fn opacity(&self) -> f32 {
        if self.visible {
            1.0
        } else {
            0.0
        }
    }
}

/// Project one point to its label placement.
///
/// A point is hidden when its depth is not strictly inside `(-1, 1)` or when
/// it cannot be projected at all.
pub fn place_label(camera: &Camera, viewport: &Viewport, position: &Point3<f32>) -> LabelPlacement {
    let Some(ndc) = camera.project(position) else {
        return LabelPlacement::HIDDEN;
    };
    let (width, height) = viewport.resolution();
    let (x, y) = ndc.to_screen(width, height);
    LabelPlacement {
        x,
        y,
        visible: ndc.is_depth_visible(),
    }
}

/// Placements for the four markers, in marker order
pub fn place_labels(
    camera: &Camera,
    viewport: &Viewport,
    positions: &[Point3<f32>; 4],
) -> [LabelPlacement; 4] {
    positions.map(|position| place_label(camera, viewport, &position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn setup() -> (Camera, Viewport) {
        let viewport = Viewport::new(800, 600).unwrap();
        (Camera::from_config(&CameraConfig::default(), viewport.aspect()), viewport)
    }

    #[test]
    fn test_origin_lands_in_centre() {
        let (camera, viewport) = setup();
        let placement = place_label(&camera, &viewport, &Point3::origin());
        assert!(placement.visible);
        assert_eq!(placement.opacity(), 1.0);
        assert!((placement.x - 400.0).abs() < 1e-3);
        assert!((placement.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_point_behind_camera_is_hidden() {
        let (camera, viewport) = setup();
        let placement = place_label(&camera, &viewport, &Point3::new(0.0, 0.0, 6.0));
        assert!(!placement.visible);
        assert_eq!(placement.opacity(), 0.0);
    }

    #[test]
    fn test_point_beyond_far_plane_is_hidden() {
        let (camera, viewport) = setup();
        let placement = place_label(&camera, &viewport, &Point3::new(0.0, 0.0, -2000.0));
        assert!(!placement.visible);
    }

    #[test]
    fn test_point_on_camera_plane_is_hidden() {
        // w == 0: nothing to divide by
        let (camera, viewport) = setup();
        let placement = place_label(&camera, &viewport, &Point3::new(1.0, 0.0, 5.0));
        assert_eq!(placement, LabelPlacement::HIDDEN);
    }

    #[test]
    fn test_upper_right_point_maps_up_and_right() {
        let (camera, viewport) = setup();
        let placement = place_label(&camera, &viewport, &Point3::new(1.0, 1.0, 0.0));
        assert!(placement.x > 400.0);
        assert!(placement.y < 300.0);
    }

    #[test]
    fn test_labels_keep_marker_order() {
        let (camera, viewport) = setup();
        let positions = [
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 6.0),
        ];
        let placements = place_labels(&camera, &viewport, &positions);
        assert!(placements[0].x < placements[1].x && placements[1].x < placements[2].x);
        assert!(!placements[3].visible);
    }
}
