/// Scene configuration.
///
/// Every tunable constant of the viewer lives here. Missing JSON fields fall
/// back to the defaults, so `{}` is a valid configuration.
use serde::{Deserialize, Serialize};

use crate::error::{Result, TetraError};
use crate::scene::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seconds for a full spin at `reference_fps`
    pub spin_period_secs: f32,
    pub reference_fps: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            spin_period_secs: 30.0,
            reference_fps: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub mesh_color: Color,
    pub mesh_opacity: f32,
    pub line_color: Color,
    /// Wireframe width in screen pixels
    pub line_width: f32,
    pub marker_color: Color,
    pub marker_radius: f32,
    pub marker_segments: u32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            mesh_color: Color::from_hex(0x44aa88),
            mesh_opacity: 0.5,
            line_color: Color::from_hex(0xff8800),
            line_width: 4.0,
            marker_color: Color::from_hex(0xff2244),
            marker_radius: 0.08,
            marker_segments: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub directional_color: Color,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 0.6,
            directional_color: Color::WHITE,
            directional_intensity: 0.8,
            directional_position: [5.0, 5.0, 5.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub light: Color,
    pub dark: Color,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            light: Color::from_hex(0xf0f0f0),
            dark: Color::from_hex(0x1a1a1a),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Fraction of the pending motion applied per frame, in `(0, 1]`
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle bounds in radians, measured from +Y
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            min_distance: 2.0,
            max_distance: 20.0,
            min_polar_angle: 0.05,
            max_polar_angle: std::f32::consts::PI - 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            enable_rotate: true,
            enable_zoom: true,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub materials: MaterialConfig,
    pub lighting: LightingConfig,
    pub background: BackgroundConfig,
    pub controls: ControlsConfig,
}

impl SceneConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid(format!("fov must be in (0, 180) degrees, got {}", camera.fov_degrees));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            ));
        }
        if camera.position == camera.target {
            return invalid("camera position and target coincide".to_string());
        }

        let animation = &self.animation;
        if !(animation.spin_period_secs > 0.0 && animation.reference_fps > 0.0) {
            return invalid(format!(
                "spin period and reference fps must be positive, got {}s at {}fps",
                animation.spin_period_secs, animation.reference_fps
            ));
        }

        let materials = &self.materials;
        if !(0.0..=1.0).contains(&materials.mesh_opacity) {
            return invalid(format!(
                "mesh opacity must be in [0, 1], got {}",
                materials.mesh_opacity
            ));
        }
        if !(materials.line_width > 0.0 && materials.marker_radius > 0.0) {
            return invalid("line width and marker radius must be positive".to_string());
        }

        let controls = &self.controls;
        if !(controls.damping_factor > 0.0 && controls.damping_factor <= 1.0) {
            return invalid(format!(
                "damping factor must be in (0, 1], got {}",
                controls.damping_factor
            ));
        }
        if !(controls.min_distance > 0.0 && controls.min_distance <= controls.max_distance) {
            return invalid(format!(
                "distance bounds must satisfy 0 < min <= max, got [{}, {}]",
                controls.min_distance, controls.max_distance
            ));
        }
        if !(controls.min_polar_angle >= 0.0
            && controls.min_polar_angle <= controls.max_polar_angle
            && controls.max_polar_angle <= std::f32::consts::PI)
        {
            return invalid(format!(
                "polar bounds must lie within [0, pi], got [{}, {}]",
                controls.min_polar_angle, controls.max_polar_angle
            ));
        }

        Ok(())
    }
}

fn invalid(message: String) -> Result<()> {
    Err(TetraError::InvalidConfig(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{ "camera": { "fov_degrees": 50 }, "background": { "dark": 0 } }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.camera.fov_degrees, 50.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.background.dark, Color::BLACK);
        assert_eq!(config.background.light, Color::from_hex(0xf0f0f0));
    }

    #[test]
    fn test_json_colors_are_hex_integers() {
        let json = SceneConfig::default().to_json().unwrap();
        assert!(json.contains(&0xf0f0f0u32.to_string()));
        assert_eq!(SceneConfig::from_json(&json).unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_rejects_inverted_clip_planes() {
        let mut config = SceneConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(matches!(config.validate(), Err(TetraError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_damping() {
        let mut config = SceneConfig::default();
        config.controls.damping_factor = 0.0;
        assert!(config.validate().is_err());
        config.controls.damping_factor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(TetraError::ConfigParse(_))
        ));
    }
}
