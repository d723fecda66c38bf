/// WebGL2 renderer for the tetrahedron scene.
///
/// Geometry is uploaded once; each frame only sets uniforms and issues three
/// kinds of draw: opaque marker spheres, screen-space thick lines, then the
/// translucent mesh with depth writes off.
use nalgebra::Matrix4;
use tetra_core::{
    scene::{Light, SurfaceMaterial},
    Camera, Color, Mesh, Scene, Segment, Transform, Viewport,
};
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

use crate::error::{Result, WebError};
use crate::shaders::{self, MAX_DIRECTIONAL_LIGHTS};

/// Floats per surface vertex: position + normal
const SURFACE_STRIDE: usize = 6;
/// Floats per line vertex: start + end + corner
const LINE_STRIDE: usize = 8;

/// Quad corners for one segment as two triangles
const LINE_CORNERS: [[f32; 2]; 6] = [
    [0.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

/// Interleave position and normal for every triangle corner
pub fn surface_vertices(mesh: &Mesh) -> Vec<f32> {
    let mut data = Vec::with_capacity(mesh.triangles.len() * 3 * SURFACE_STRIDE);
    for triangle in &mesh.triangles {
        for vertex in &triangle.vertices {
            data.extend_from_slice(vertex.position.coords.as_slice());
            data.extend_from_slice(vertex.normal.as_slice());
        }
    }
    data
}

/// Six vertices per segment, each carrying both endpoints and its corner
pub fn line_vertices(segments: &[Segment]) -> Vec<f32> {
    let mut data = Vec::with_capacity(segments.len() * LINE_CORNERS.len() * LINE_STRIDE);
    for segment in segments {
        for corner in &LINE_CORNERS {
            data.extend_from_slice(segment.start.coords.as_slice());
            data.extend_from_slice(segment.end.coords.as_slice());
            data.extend_from_slice(corner);
        }
    }
    data
}

/// Scene lights flattened into surface shader uniforms
#[derive(Debug, Clone, PartialEq)]
pub struct LightUniforms {
    pub ambient: [f32; 3],
    pub count: usize,
    pub directions: [f32; 3 * MAX_DIRECTIONAL_LIGHTS],
    pub colors: [f32; 3 * MAX_DIRECTIONAL_LIGHTS],
}

impl LightUniforms {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniforms = Self {
            ambient: [0.0; 3],
            count: 0,
            directions: [0.0; 3 * MAX_DIRECTIONAL_LIGHTS],
            colors: [0.0; 3 * MAX_DIRECTIONAL_LIGHTS],
        };
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let color = color.scaled(intensity);
                    uniforms.ambient[0] += color.r;
                    uniforms.ambient[1] += color.g;
                    uniforms.ambient[2] += color.b;
                }
                Light::Directional { color, intensity, .. } => {
                    let Some(direction) = light.direction() else {
                        continue;
                    };
                    if uniforms.count == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("ignoring directional light beyond {MAX_DIRECTIONAL_LIGHTS}");
                        continue;
                    }
                    let color = color.scaled(intensity);
                    let slot = uniforms.count * 3;
                    uniforms.directions[slot..slot + 3].copy_from_slice(direction.as_slice());
                    uniforms.colors[slot..slot + 3].copy_from_slice(&[color.r, color.g, color.b]);
                    uniforms.count += 1;
                }
            }
        }
        uniforms
    }
}

struct SurfaceProgram {
    program: WebGlProgram,
    u_model: Option<WebGlUniformLocation>,
    u_view_projection: Option<WebGlUniformLocation>,
    u_color: Option<WebGlUniformLocation>,
    u_double_sided: Option<WebGlUniformLocation>,
    u_ambient: Option<WebGlUniformLocation>,
    u_light_count: Option<WebGlUniformLocation>,
    u_light_directions: Option<WebGlUniformLocation>,
    u_light_colors: Option<WebGlUniformLocation>,
}

impl SurfaceProgram {
    fn new(gl: &GL) -> Result<Self> {
        let program = link_program(gl, shaders::SURFACE_VERTEX, shaders::SURFACE_FRAGMENT)?;
        let uniform = |name| gl.get_uniform_location(&program, name);
        Ok(Self {
            u_model: uniform("u_model"),
            u_view_projection: uniform("u_view_projection"),
            u_color: uniform("u_color"),
            u_double_sided: uniform("u_double_sided"),
            u_ambient: uniform("u_ambient"),
            u_light_count: uniform("u_light_count"),
            u_light_directions: uniform("u_light_directions"),
            u_light_colors: uniform("u_light_colors"),
            program,
        })
    }

    fn bind(&self, gl: &GL, view_projection: &Matrix4<f32>, lights: &LightUniforms) {
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(
            self.u_view_projection.as_ref(),
            false,
            view_projection.as_slice(),
        );
        let [r, g, b] = lights.ambient;
        gl.uniform3f(self.u_ambient.as_ref(), r, g, b);
        gl.uniform1i(self.u_light_count.as_ref(), lights.count as i32);
        gl.uniform3fv_with_f32_array(self.u_light_directions.as_ref(), &lights.directions);
        gl.uniform3fv_with_f32_array(self.u_light_colors.as_ref(), &lights.colors);
    }

    fn set_material(&self, gl: &GL, material: &SurfaceMaterial) {
        let Color { r, g, b } = material.color;
        gl.uniform4f(self.u_color.as_ref(), r, g, b, material.opacity);
        gl.uniform1i(self.u_double_sided.as_ref(), material.double_sided as i32);
    }

    fn set_model(&self, gl: &GL, model: &Matrix4<f32>) {
        gl.uniform_matrix4fv_with_f32_array(self.u_model.as_ref(), false, model.as_slice());
    }
}

struct LineProgram {
    program: WebGlProgram,
    u_model: Option<WebGlUniformLocation>,
    u_view_projection: Option<WebGlUniformLocation>,
    u_resolution: Option<WebGlUniformLocation>,
    u_linewidth: Option<WebGlUniformLocation>,
    u_color: Option<WebGlUniformLocation>,
}

impl LineProgram {
    fn new(gl: &GL) -> Result<Self> {
        let program = link_program(gl, shaders::LINE_VERTEX, shaders::LINE_FRAGMENT)?;
        let uniform = |name| gl.get_uniform_location(&program, name);
        Ok(Self {
            u_model: uniform("u_model"),
            u_view_projection: uniform("u_view_projection"),
            u_resolution: uniform("u_resolution"),
            u_linewidth: uniform("u_linewidth"),
            u_color: uniform("u_color"),
            program,
        })
    }
}

/// Uploaded vertex data plus its attribute layout
struct GpuGeometry {
    vao: WebGlVertexArrayObject,
    // Owned so the buffer lives as long as the vertex array that reads it
    _buffer: WebGlBuffer,
    vertex_count: i32,
}

impl GpuGeometry {
    fn upload(
        gl: &GL,
        program: &WebGlProgram,
        data: &[f32],
        attributes: &[(&str, i32)],
    ) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or(WebError::Allocation("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = gl.create_buffer().ok_or(WebError::Allocation("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, bytemuck::cast_slice(data), GL::STATIC_DRAW);

        let floats_per_vertex: i32 = attributes.iter().map(|(_, size)| size).sum();
        let stride = floats_per_vertex * std::mem::size_of::<f32>() as i32;
        let mut offset = 0;
        for &(name, size) in attributes {
            let location = gl.get_attrib_location(program, name);
            if location >= 0 {
                gl.enable_vertex_attrib_array(location as u32);
                gl.vertex_attrib_pointer_with_i32(
                    location as u32,
                    size,
                    GL::FLOAT,
                    false,
                    stride,
                    offset,
                );
            } else {
                log::debug!("attribute {name} optimised out");
            }
            offset += size * std::mem::size_of::<f32>() as i32;
        }

        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            _buffer: buffer,
            vertex_count: data.len() as i32 / floats_per_vertex.max(1),
        })
    }

    fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, self.vertex_count);
        gl.bind_vertex_array(None);
    }
}

pub struct GlRenderer {
    gl: GL,
    surface: SurfaceProgram,
    lines: LineProgram,
    tetrahedron: GpuGeometry,
    wireframe: GpuGeometry,
    marker: GpuGeometry,
}

impl GlRenderer {
    /// Compile shaders and upload the scene's static geometry
    pub fn new(gl: GL, scene: &Scene) -> Result<Self> {
        let surface = SurfaceProgram::new(&gl)?;
        let lines = LineProgram::new(&gl)?;

        let surface_attributes = [("a_position", 3), ("a_normal", 3)];
        let tetrahedron = GpuGeometry::upload(
            &gl,
            &surface.program,
            &surface_vertices(&scene.tetrahedron.mesh),
            &surface_attributes,
        )?;
        let marker = GpuGeometry::upload(
            &gl,
            &surface.program,
            &surface_vertices(&scene.marker_mesh),
            &surface_attributes,
        )?;
        let wireframe = GpuGeometry::upload(
            &gl,
            &lines.program,
            &line_vertices(&scene.wireframe.segments),
            &[("a_start", 3), ("a_end", 3), ("a_corner", 2)],
        )?;

        gl.enable(GL::DEPTH_TEST);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        Ok(Self {
            gl,
            surface,
            lines,
            tetrahedron,
            wireframe,
            marker,
        })
    }

    /// Match the drawing buffer to the viewport's physical size
    pub fn resize(&self, viewport: &Viewport) {
        let (width, height) = viewport.physical_size();
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    pub fn render(&self, scene: &Scene, camera: &Camera) {
        let gl = &self.gl;
        let view_projection = camera.view_projection();
        let lights = LightUniforms::from_lights(&scene.lights);

        let Color { r, g, b } = scene.background;
        gl.clear_color(r, g, b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        // Opaque markers
        self.surface.bind(gl, &view_projection, &lights);
        self.surface.set_material(gl, &scene.marker_material);
        gl.enable(GL::CULL_FACE);
        for marker in &scene.markers {
            self.surface.set_model(gl, &marker.model_matrix());
            self.marker.draw(gl);
        }
        gl.disable(GL::CULL_FACE);

        // Thick wireframe
        let wireframe = &scene.wireframe;
        let material = &wireframe.material;
        gl.use_program(Some(&self.lines.program));
        gl.uniform_matrix4fv_with_f32_array(
            self.lines.u_view_projection.as_ref(),
            false,
            view_projection.as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.lines.u_model.as_ref(),
            false,
            Transform::rotation_matrix(&wireframe.rotation).as_slice(),
        );
        let (width, height) = material.resolution;
        gl.uniform2f(self.lines.u_resolution.as_ref(), width, height);
        gl.uniform1f(self.lines.u_linewidth.as_ref(), material.linewidth);
        let Color { r, g, b } = material.color;
        gl.uniform4f(self.lines.u_color.as_ref(), r, g, b, 1.0);
        self.wireframe.draw(gl);

        // Translucent mesh last, without writing depth
        let mesh = &scene.tetrahedron;
        self.surface.bind(gl, &view_projection, &lights);
        self.surface.set_material(gl, &mesh.material);
        self.surface
            .set_model(gl, &Transform::rotation_matrix(&mesh.rotation));
        let transparent = mesh.material.is_transparent();
        if transparent {
            gl.enable(GL::BLEND);
            gl.depth_mask(false);
        }
        self.tetrahedron.draw(gl);
        if transparent {
            gl.depth_mask(true);
            gl.disable(GL::BLEND);
        }
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let stage = if kind == GL::VERTEX_SHADER { "vertex" } else { "fragment" };
    let shader = gl.create_shader(kind).ok_or(WebError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(WebError::ShaderCompile { stage, log })
    }
}

fn link_program(gl: &GL, vertex_source: &str, fragment_source: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_source)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_source)?;
    let program = gl.create_program().ok_or(WebError::Allocation("program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    if linked {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(WebError::ProgramLink(log))
    }
}
