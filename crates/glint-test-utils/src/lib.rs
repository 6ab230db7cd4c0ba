//! Render context abstraction and test utilities for Glint.
//!
//! The text surface renderer never talks to `wgpu` directly. It goes through
//! two small seams defined here:
//!
//! - [`RenderContext`]: texture creation, sub-rectangle uploads, destruction,
//!   and the "is a context current" check.
//! - [`QuadPass`]: drawing a textured quad with a scoped blend mode.
//!
//! `glint-render` implements both on top of `wgpu`. With the `mock` feature
//! this crate also provides [`MockRenderContext`] and [`MockQuadPass`], which
//! record every call so tests can assert on uploads without a GPU.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use glint_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//! let texture = mock.create_texture(&TextureDescriptor {
//!     label: Some("test_texture"),
//!     size: Extent3d { width: 64, height: 16, depth_or_array_layers: 1 },
//!     mip_level_count: 1,
//!     sample_count: 1,
//!     dimension: TextureDimension::D2,
//!     format: TextureFormat::Rgba8Unorm,
//!     usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
//!     view_formats: &[],
//! });
//!
//! assert!(texture.is_mock());
//! assert_eq!(mock.count_texture_creates(), 1);
//! # }
//! ```

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod quad_pass;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use quad_pass::*;
pub use render_context::*;
