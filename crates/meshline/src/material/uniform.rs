use bytemuck::{Pod, Zeroable};

/// Uniform block layout shared with `shaders/meshline.wgsl` (240 bytes):
///
///  offset   0  model_view_projection  mat4x4
///  offset  64  projection             mat4x4
///  offset 128  color                  vec4   (.a = opacity)
///  offset 144  gradient_start         vec4
///  offset 160  gradient_end           vec4
///  offset 176  resolution             vec2
///  offset 184  repeat                 vec2
///  offset 192  scalars                12 x f32 (flags are 0.0 / 1.0)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineUniform {
    pub model_view_projection: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub gradient_start: [f32; 4],
    pub gradient_end: [f32; 4],
    pub resolution: [f32; 2],
    pub repeat: [f32; 2],
    pub line_width: f32,
    pub size_attenuation: f32,
    pub dash_array: f32,
    pub dash_offset: f32,
    pub dash_ratio: f32,
    pub use_dash: f32,
    pub use_gradient: f32,
    pub visibility: f32,
    pub alpha_test: f32,
    pub use_map: f32,
    pub use_alpha_map: f32,
    pub _pad: f32, // 16-byte alignment
}

/// Returns the `wgpu` minimum binding size for the line uniform buffer.
pub(crate) fn line_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<LineUniform>() as u64)
        .expect("LineUniform has non-zero size by construction")
}
