//! Glint Render - GPU context and textured quad drawing.
//!
//! - [`GraphicsContext`]: `wgpu` instance/adapter/device/queue with device-loss
//!   tracking; implements [`RenderContext`] for texture management.
//! - [`QuadRenderer`] / [`ScreenQuadPass`]: draw textured quads into an open
//!   render pass, with the blend mode as scoped pass state.
//! - [`Color`] / [`Rgba8`]: float and 8-bit colors.

mod color;
mod context;
mod context_impl;
mod quad;

pub use color::{Color, Rgba8};
pub use context::{GraphicsContext, GraphicsContextDescriptor, GraphicsError};
pub use quad::{QuadRenderer, QuadRendererOptions, QuadVertex, ScreenQuadPass, quad_vertices};

pub use glint_test_utils::{
    BlendMode, GpuTexture, QuadFilter, QuadPass, RenderContext, ScopedBlend, TextureRegion,
    TexturedQuad,
};

// Re-export wgpu so downstream crates agree on the version.
pub use wgpu;
