/// Damped orbit controls.
///
/// Pointer input accumulates into a pending spherical delta. Every call to
/// [`OrbitControls::update`] applies `damping_factor` of the pending motion to
/// the camera and keeps the rest for the following frames, so a single drag
/// eases out over many frames. The camera always looks at its target; pan is
/// not supported.
use std::f32::consts::PI;

use nalgebra::Vector3;

use crate::config::ControlsConfig;
use crate::projection::Camera;

/// Pending motion below this is dropped
const REST_EPSILON: f32 = 1e-6;

/// Closest the camera may get to the up axis, whatever the configured bounds
const POLE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct SphericalDelta {
    theta: f32,
    phi: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: ControlsConfig,
    delta: SphericalDelta,
    scale: f32,
    drag_origin: Option<(f32, f32)>,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            config,
            delta: SphericalDelta::default(),
            scale: 1.0,
            drag_origin: None,
        }
    }

    /// Orbit horizontally around the target
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    /// Orbit vertically around the target
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Multiply the pending distance scale; values above 1 move away
    pub fn dolly(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale *= scale;
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.config.enable_rotate {
            self.drag_origin = Some((x, y));
        }
    }

    /// Drag across the full viewport height turns the camera by a full circle
    pub fn pointer_move(&mut self, x: f32, y: f32, viewport_height: f32) {
        let Some((last_x, last_y)) = self.drag_origin else {
            return;
        };
        self.drag_origin = Some((x, y));
        if viewport_height <= 0.0 {
            return;
        }
        let per_pixel = 2.0 * PI * self.config.rotate_speed / viewport_height;
        self.rotate_left((x - last_x) * per_pixel);
        self.rotate_up((y - last_y) * per_pixel);
    }

    pub fn pointer_up(&mut self) {
        self.drag_origin = None;
    }

    /// Positive `delta_y` (scrolling down) zooms out
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.config.enable_zoom || delta_y == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.config.zoom_speed);
        if delta_y > 0.0 {
            self.dolly(1.0 / step);
        } else {
            self.dolly(step);
        }
    }

    /// Apply one frame of damped motion to the camera.
    ///
    /// Returns true if the camera position changed.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let config = &self.config;
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return false;
        }

        let theta = offset.x.atan2(offset.z) + self.delta.theta * config.damping_factor;
        let unclamped_phi =
            (offset.y / radius).clamp(-1.0, 1.0).acos() + self.delta.phi * config.damping_factor;
        let phi = unclamped_phi
            .clamp(config.min_polar_angle, config.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let unclamped_radius = radius * self.scale;
        let radius = unclamped_radius.clamp(config.min_distance, config.max_distance);

        if phi != unclamped_phi {
            log::debug!("orbit polar angle clamped to {phi:.3}");
        }
        if radius != unclamped_radius {
            log::debug!("orbit distance clamped to {radius:.3}");
        }

        let sin_phi = phi.sin();
        let offset = Vector3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        let previous = camera.position;
        camera.position = camera.target + offset;

        self.delta.theta *= 1.0 - config.damping_factor;
        self.delta.phi *= 1.0 - config.damping_factor;
        if self.delta.theta.abs() < REST_EPSILON {
            self.delta.theta = 0.0;
        }
        if self.delta.phi.abs() < REST_EPSILON {
            self.delta.phi = 0.0;
        }
        self.scale = 1.0;

        (camera.position - previous).norm_squared() > REST_EPSILON * REST_EPSILON
    }
}
