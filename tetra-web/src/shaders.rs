// GLSL ES 3.00 sources

/// Upper bound on directional lights the surface shader evaluates
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

pub const SURFACE_VERTEX: &str = r#"#version 300 es
in vec3 a_position;
in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view_projection;

out vec3 v_normal;

void main() {
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_view_projection * u_model * vec4(a_position, 1.0);
}
"#;

pub const SURFACE_FRAGMENT: &str = r#"#version 300 es
precision highp float;

#define MAX_DIRECTIONAL_LIGHTS 4

in vec3 v_normal;

uniform vec4 u_color;
uniform bool u_double_sided;
uniform vec3 u_ambient;
uniform int u_light_count;
uniform vec3 u_light_directions[MAX_DIRECTIONAL_LIGHTS];
uniform vec3 u_light_colors[MAX_DIRECTIONAL_LIGHTS];

out vec4 frag_color;

void main() {
    vec3 normal = normalize(v_normal);
    if (u_double_sided && !gl_FrontFacing) {
        normal = -normal;
    }

    vec3 light = u_ambient;
    for (int i = 0; i < MAX_DIRECTIONAL_LIGHTS; i++) {
        if (i >= u_light_count) {
            break;
        }
        light += u_light_colors[i] * max(dot(normal, u_light_directions[i]), 0.0);
    }

    frag_color = vec4(u_color.rgb * light, u_color.a);
}
"#;

/// Expands each segment into a quad `u_linewidth` screen pixels wide.
///
/// Every vertex carries both endpoints; `a_corner.x` picks the endpoint and
/// `a_corner.y` the side of the line.
pub const LINE_VERTEX: &str = r#"#version 300 es
in vec3 a_start;
in vec3 a_end;
in vec2 a_corner;

uniform mat4 u_model;
uniform mat4 u_view_projection;
uniform vec2 u_resolution;
uniform float u_linewidth;

void main() {
    mat4 mvp = u_view_projection * u_model;
    vec4 clip_start = mvp * vec4(a_start, 1.0);
    vec4 clip_end = mvp * vec4(a_end, 1.0);

    vec2 half_resolution = u_resolution * 0.5;
    vec2 screen_start = clip_start.xy / clip_start.w * half_resolution;
    vec2 screen_end = clip_end.xy / clip_end.w * half_resolution;

    vec2 direction = screen_end - screen_start;
    direction = length(direction) > 0.0 ? normalize(direction) : vec2(1.0, 0.0);
    vec2 normal = vec2(-direction.y, direction.x);

    vec4 clip = a_corner.x < 0.5 ? clip_start : clip_end;
    vec2 offset = normal * a_corner.y * u_linewidth * 0.5;
    clip.xy += offset / half_resolution * clip.w;
    gl_Position = clip;
}
"#;

pub const LINE_FRAGMENT: &str = r#"#version 300 es
precision highp float;

uniform vec4 u_color;

out vec4 frag_color;

void main() {
    frag_color = u_color;
}
"#;
