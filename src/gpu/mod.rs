// ============================================================================
// GPU MODULE — wgpu presentation of the decoded image
// ============================================================================
//
// Architecture:
//   context.rs — window surface, wgpu Device, Queue, adapter init
//   shaders.rs — WGSL shader source (inline strings)
//   texture.rs — ImageTexture: one-time upload of the PixelBuffer
//   quad.rs    — static quad geometry + render pipeline + per-frame MVP
// ============================================================================

pub mod context;
pub mod quad;
pub mod shaders;
pub mod texture;

pub use context::{GpuContext, GpuError};
pub use quad::{Filtering, QuadPipeline};
pub use texture::ImageTexture;
