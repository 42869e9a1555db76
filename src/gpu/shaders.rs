// ============================================================================
// GPU SHADERS — WGSL source kept inline
// ============================================================================

// ============================================================================
// QUAD SHADER — textured quad under a single model-view-projection matrix
// ============================================================================
//
// Vertex buffer layout matches `quad::Vertex`: location 0 = position (xy in
// quad space, corners at ±1), location 1 = texture coordinate.  The CPU
// uploads `projection × view` once per frame; nothing else varies.
pub const QUAD_SHADER: &str = r#"
struct ViewUniforms {
    mvp: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> u: ViewUniforms;
@group(1) @binding(0) var image_tex: texture_2d<f32>;
@group(1) @binding(1) var image_samp: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) tex_coord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_quad(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.position = u.mvp * vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.tex_coord;
    return out;
}

@fragment
fn fs_quad(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(image_tex, image_samp, in.uv);
}
"#;
