/// Geometry primitives and the fixed tetrahedron data
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

/// Face indices into [`tetrahedron_vertices`], counter-clockwise seen from outside
pub const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

/// Every vertex pair of the tetrahedron
pub const TETRAHEDRON_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// The four alternating corners of the cube `[-1, 1]^3`.
pub fn tetrahedron_vertices() -> [Point3<f32>; 4] {
    [
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
    ]
}

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }
}

fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1.cross(&edge2).normalize()
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Build a mesh from shared positions and face indices.
    ///
    /// Normals are smooth: each vertex gets the normalised sum of the face
    /// normals of every face that references it.
    pub fn from_indexed(positions: &[Point3<f32>], faces: &[[usize; 3]]) -> Self {
        let mut normals = vec![Vector3::zeros(); positions.len()];
        for face in faces {
            let normal = face_normal(
                &positions[face[0]],
                &positions[face[1]],
                &positions[face[2]],
            );
            for &index in face {
                normals[index] += normal;
            }
        }
        for normal in normals.iter_mut() {
            if let Some(unit) = normal.try_normalize(f32::EPSILON) {
                *normal = unit;
            }
        }

        let mut mesh = Self::with_capacity(faces.len());
        for face in faces {
            let [a, b, c] = face.map(|i| Vertex::from_parts(positions[i], normals[i]));
            mesh.add_triangle(Triangle::new(a, b, c));
        }
        mesh
    }

    /// The regular tetrahedron with smooth shading normals
    pub fn tetrahedron() -> Self {
        Self::from_indexed(&tetrahedron_vertices(), &TETRAHEDRON_FACES)
    }

    /// UV sphere centred at the origin.
    ///
    /// Segment counts are clamped to at least 3 around and 2 from pole to pole.
    /// Degenerate triangles at the poles are skipped.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let ring_count = (width_segments + 1) * (height_segments + 1);
        let mut positions = Vec::with_capacity(ring_count as usize);
        for iy in 0..=height_segments {
            let phi = iy as f32 / height_segments as f32 * PI;
            for ix in 0..=width_segments {
                let theta = ix as f32 / width_segments as f32 * 2.0 * PI;
                positions.push(Point3::new(
                    -radius * phi.sin() * theta.cos(),
                    radius * phi.cos(),
                    radius * phi.sin() * theta.sin(),
                ));
            }
        }

        let vertex = |index: u32| {
            let position = positions[index as usize];
            let normal = position.coords.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::y);
            Vertex::from_parts(position, normal)
        };

        let mut mesh = Self::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * (width_segments + 1) + ix;
                let b = a + width_segments + 1;
                let c = b + 1;
                let d = a + 1;

                if iy != 0 {
                    mesh.add_triangle(Triangle::new(vertex(a), vertex(b), vertex(d)));
                }
                if iy != height_segments - 1 {
                    mesh.add_triangle(Triangle::new(vertex(b), vertex(c), vertex(d)));
                }
            }
        }
        mesh
    }
}

/// A straight line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

impl Segment {
    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }
}

/// Line segments for each `(a, b)` index pair
pub fn edge_segments(vertices: &[Point3<f32>], edges: &[(usize, usize)]) -> Vec<Segment> {
    edges
        .iter()
        .map(|&(a, b)| Segment {
            start: vertices[a],
            end: vertices[b],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_tetrahedron_edges() {
        let segments = edge_segments(&tetrahedron_vertices(), &TETRAHEDRON_EDGES);
        assert_eq!(segments.len(), 6);
        let expected = 2.0 * 2.0_f32.sqrt();
        for segment in &segments {
            assert!((segment.length() - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        let mesh = Mesh::tetrahedron();
        assert_eq!(mesh.triangles.len(), 4);
        for triangle in &mesh.triangles {
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position.coords)
                / 3.0;
            assert!(triangle.calculate_normal().dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_smooth_normals_point_away_from_centre() {
        // Averaged face normals of a regular tetrahedron centred at the origin
        // are the normalised vertex directions.
        let mesh = Mesh::tetrahedron();
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                let expected = vertex.position.coords.normalize();
                assert!((vertex.normal - expected).norm() < 1e-5);
            }
        }
    }

    #[test]
    fn test_every_vertex_pair_is_an_edge() {
        let mut seen = [[false; 4]; 4];
        for &(a, b) in &TETRAHEDRON_EDGES {
            assert_ne!(a, b);
            seen[a][b] = true;
            seen[b][a] = true;
        }
        for a in 0..4 {
            for b in 0..4 {
                assert_eq!(seen[a][b], a != b);
            }
        }
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let sphere = Mesh::sphere(0.5, 8, 6);
        assert!(!sphere.triangles.is_empty());
        for triangle in &sphere.triangles {
            for vertex in &triangle.vertices {
                assert!((vertex.position.coords.norm() - 0.5).abs() < 1e-5);
                assert!((vertex.normal.norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_sphere_clamps_segments() {
        // 3 around, 2 high: one row of caps per pole
        let sphere = Mesh::sphere(1.0, 0, 0);
        assert_eq!(sphere.triangles.len(), 6);
    }
}
