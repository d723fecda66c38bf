/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::{self, Write};
use tetra_core::{
    scene::{Light, Marker, MeshObject, Wireframe},
    Camera, Color as SceneColor, FrameRenderer, LabelPlacement, Scene, Transform, Triangle,
};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const LINE_CHAR: char = '#';
const MARKER_CHAR: char = 'O';

/// Terminal cells are about twice as tall as wide, so each cell covers two
/// rows of the virtual pixel grid the camera projects onto.
pub const CELL_ASPECT: u32 = 2;

/// Lines and markers win depth ties against the faces they sit on
const DEPTH_BIAS: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: SceneColor,
}

/// ASCII renderer that converts the scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Option<Cell>>,
    background: SceneColor,
    labels: [LabelPlacement; 4],
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![None; size],
            background: SceneColor::BLACK,
            labels: [LabelPlacement::HIDDEN; 4],
        }
    }

    /// Size of the virtual pixel grid the camera should project onto
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32 * CELL_ASPECT)
    }

    fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(None);
    }

    fn project(
        &self,
        camera: &Camera,
        point: &Point3<f32>,
        model: &Matrix4<f32>,
    ) -> Option<(f32, f32, f32)> {
        let (width, height) = self.pixel_size();
        camera
            .project_to_screen(point, model, width, height)
            .map(|(x, y, z)| (x, y / CELL_ASPECT as f32, z))
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = Some(cell);
        }
    }

    fn render_mesh(&mut self, object: &MeshObject, camera: &Camera, lights: &[Light]) {
        let model = Transform::rotation_matrix(&object.rotation);
        for triangle in &object.mesh.triangles {
            self.render_triangle(triangle, object, &model, camera, lights);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        object: &MeshObject,
        model: &Matrix4<f32>,
        camera: &Camera,
        lights: &[Light],
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.project(camera, &vertex.position, model) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Face normal in world space for shading
        let normal = model.transform_vector(&triangle.calculate_normal());
        let brightness = shade(&normal, lights, object.material.double_sided);

        // Translucent faces never reach the brightest glyphs
        let brightness = brightness * object.material.opacity.max(0.5);
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color: object.material.color.scaled(brightness.max(0.3)),
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, cell);
                    }
                }
            }
        }
    }

    fn render_wireframe(&mut self, wireframe: &Wireframe, camera: &Camera) {
        let model = Transform::rotation_matrix(&wireframe.rotation);
        let cell = Cell {
            character: LINE_CHAR,
            color: wireframe.material.color,
        };
        for segment in &wireframe.segments {
            let (Some(start), Some(end)) = (
                self.project(camera, &segment.start, &model),
                self.project(camera, &segment.end, &model),
            ) else {
                continue;
            };
            self.draw_line(start, end, cell);
        }
    }

    /// DDA line with interpolated depth
    fn draw_line(&mut self, start: (f32, f32, f32), end: (f32, f32, f32), cell: Cell) {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = start.0 + dx * t;
            let y = start.1 + dy * t;
            let depth = start.2 + (end.2 - start.2) * t - DEPTH_BIAS;
            self.plot(x.floor() as i32, y.floor() as i32, depth, cell);
        }
    }

    fn render_marker(&mut self, marker: &Marker, color: SceneColor, camera: &Camera) {
        if let Some((x, y, depth)) = self.project(camera, &marker.position, &Matrix4::identity()) {
            let cell = Cell {
                character: MARKER_CHAR,
                color,
            };
            self.plot(x.floor() as i32, y.floor() as i32, depth - 2.0 * DEPTH_BIAS, cell);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let background = to_terminal_color(self.background);
        let label_color = if self.background.luminance() > 0.5 {
            Color::Black
        } else {
            Color::White
        };
        let label_cells: Vec<(usize, usize, char)> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.visible)
            .filter_map(|(index, label)| {
                // One cell up and right of the marker so the glyph stays visible
                let column = label.x.floor() as i64 + 1;
                let row = (label.y / CELL_ASPECT as f32).floor() as i64 - 1;
                let in_bounds = column >= 0
                    && row >= 0
                    && (column as usize) < self.width
                    && (row as usize) < self.height;
                let digit = char::from_digit(index as u32, 10)?;
                in_bounds.then_some((column as usize, row as usize, digit))
            })
            .collect();

        writer.queue(SetBackgroundColor(background))?;
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(&(_, _, digit)) =
                    label_cells.iter().find(|(column, row, _)| *column == x && *row == y)
                {
                    writer.queue(SetForegroundColor(label_color))?;
                    writer.queue(Print(digit))?;
                    continue;
                }

                match self.cells[y * self.width + x] {
                    Some(cell) => {
                        writer.queue(SetForegroundColor(to_terminal_color(cell.color)))?;
                        writer.queue(Print(cell.character))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl FrameRenderer for AsciiRenderer {
    type Error = io::Error;

    fn place_labels(&mut self, labels: &[LabelPlacement; 4]) -> io::Result<()> {
        self.labels = *labels;
        Ok(())
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> io::Result<()> {
        self.clear();
        self.background = scene.background;

        for marker in &scene.markers {
            self.render_marker(marker, scene.marker_material.color, camera);
        }
        self.render_wireframe(&scene.wireframe, camera);
        self.render_mesh(&scene.tetrahedron, camera, &scene.lights);
        Ok(())
    }
}

/// Lambert brightness in `[0, 1]` from every light in the scene
fn shade(normal: &Vector3<f32>, lights: &[Light], double_sided: bool) -> f32 {
    let brightness: f32 = lights
        .iter()
        .map(|light| match *light {
            Light::Ambient { intensity, .. } => intensity,
            Light::Directional { intensity, .. } => {
                let Some(direction) = light.direction() else {
                    return 0.0;
                };
                let lambert = normal.dot(&direction);
                let lambert = if double_sided { lambert.abs() } else { lambert.max(0.0) };
                intensity * lambert
            }
        })
        .sum();
    brightness.clamp(0.0, 1.0)
}

fn to_terminal_color(color: SceneColor) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetra_core::{AppState, SceneConfig, Viewport};

    fn app_for(renderer: &AsciiRenderer) -> AppState {
        let (width, height) = renderer.pixel_size();
        AppState::new(SceneConfig::default(), Viewport::new(width, height).unwrap()).unwrap()
    }

    #[test]
    fn test_barycentric_centroid() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn test_pixel_grid_doubles_rows() {
        let renderer = AsciiRenderer::new(80, 24);
        assert_eq!(renderer.pixel_size(), (80, 48));
    }

    #[test]
    fn test_frame_draws_tetrahedron_in_centre() {
        let mut renderer = AsciiRenderer::new(80, 24);
        let mut app = app_for(&renderer);
        app.frame(&mut renderer).unwrap();
        assert!(renderer.cells[12 * renderer.width + 40].is_some());
        assert!(renderer.cells[0].is_none());
    }

    #[test]
    fn test_draw_emits_every_row() {
        let mut renderer = AsciiRenderer::new(20, 6);
        let mut app = app_for(&renderer);
        app.frame(&mut renderer).unwrap();

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 5);
    }

    #[test]
    fn test_double_sided_shading() {
        let lights = [Light::Directional {
            color: SceneColor::WHITE,
            intensity: 1.0,
            position: Point3::new(0.0, 0.0, 1.0),
        }];
        let back = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(shade(&back, &lights, false), 0.0);
        assert_eq!(shade(&back, &lights, true), 1.0);
    }
}
