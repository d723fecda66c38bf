/// The scene graph: everything the renderers draw.
///
/// Geometry is built once by [`Scene::new`]. Afterwards only object
/// orientation, marker positions, the background colour and the line
/// material resolution change.
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::geometry::{edge_segments, tetrahedron_vertices, Mesh, Segment, TETRAHEDRON_EDGES};
use crate::transform::{RotationState, Transform};
use crate::viewport::Viewport;

/// Linear RGB colour, serialized as a `0xRRGGBB` integer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let hex = self.to_hex();
        ((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Relative luminance, used to pick contrasting glyphs
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
        }
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Lambert-shaded surface material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub color: Color,
    pub opacity: f32,
    pub double_sided: bool,
}

impl SurfaceMaterial {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Material for lines whose width is measured in screen pixels.
///
/// `resolution` must track the viewport size so renderers can turn the
/// pixel width into a screen-space offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMaterial {
    pub color: Color,
    pub linewidth: f32,
    pub resolution: (f32, f32),
}

/// The translucent tetrahedron
#[derive(Debug, Clone)]
pub struct MeshObject {
    pub mesh: Mesh,
    pub material: SurfaceMaterial,
    pub rotation: RotationState,
}

/// Thick-line edges of the tetrahedron
#[derive(Debug, Clone)]
pub struct Wireframe {
    pub segments: Vec<Segment>,
    pub material: LineMaterial,
    pub rotation: RotationState,
}

/// A small sphere following one tetrahedron vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Vertex position before any rotation
    pub origin: Point3<f32>,
    /// Current world position
    pub position: Point3<f32>,
}

impl Marker {
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(self.position.x, self.position.y, self.position.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// Shines from `position` towards the origin
    Directional {
        color: Color,
        intensity: f32,
        position: Point3<f32>,
    },
}

impl Light {
    /// Direction pointing from the origin towards the light, if any
    pub fn direction(&self) -> Option<Vector3<f32>> {
        match self {
            Light::Ambient { .. } => None,
            Light::Directional { position, .. } => position.coords.try_normalize(f32::EPSILON),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub tetrahedron: MeshObject,
    pub wireframe: Wireframe,
    pub markers: [Marker; 4],
    /// Shared geometry for every marker, centred at the origin
    pub marker_mesh: Mesh,
    pub marker_material: SurfaceMaterial,
    pub lights: Vec<Light>,
}

impl Scene {
    /// Build the static scene for the given configuration and viewport
    pub fn new(config: &SceneConfig, viewport: Viewport) -> Self {
        let vertices = tetrahedron_vertices();
        let materials = &config.materials;
        let lighting = &config.lighting;

        let markers = vertices.map(|origin| Marker {
            origin,
            position: origin,
        });

        Self {
            background: config.background.light,
            tetrahedron: MeshObject {
                mesh: Mesh::tetrahedron(),
                material: SurfaceMaterial {
                    color: materials.mesh_color,
                    opacity: materials.mesh_opacity,
                    double_sided: true,
                },
                rotation: RotationState::zero(),
            },
            wireframe: Wireframe {
                segments: edge_segments(&vertices, &TETRAHEDRON_EDGES),
                material: LineMaterial {
                    color: materials.line_color,
                    linewidth: materials.line_width,
                    resolution: viewport.resolution(),
                },
                rotation: RotationState::zero(),
            },
            markers,
            marker_mesh: Mesh::sphere(
                materials.marker_radius,
                materials.marker_segments,
                (materials.marker_segments / 2).max(2),
            ),
            marker_material: SurfaceMaterial {
                color: materials.marker_color,
                opacity: 1.0,
                double_sided: false,
            },
            lights: vec![
                Light::Ambient {
                    color: lighting.ambient_color,
                    intensity: lighting.ambient_intensity,
                },
                Light::Directional {
                    color: lighting.directional_color,
                    intensity: lighting.directional_intensity,
                    position: Point3::from(lighting.directional_position),
                },
            ],
        }
    }

    /// Orient mesh and wireframe, then recompute every marker from its origin
    pub fn apply_rotation(&mut self, rotation: RotationState) {
        self.tetrahedron.rotation = rotation;
        self.wireframe.rotation = rotation;
        for marker in self.markers.iter_mut() {
            marker.position = rotation.apply(&marker.origin);
        }
    }

    pub fn marker_positions(&self) -> [Point3<f32>; 4] {
        self.markers.map(|marker| marker.position)
    }
}
