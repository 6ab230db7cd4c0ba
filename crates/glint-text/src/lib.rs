//! Glint Text - offscreen text surfaces with partial GPU upload
//!
//! This crate draws strings into a CPU-side BGRA pixel buffer and mirrors it
//! into a GPU texture:
//! - Font lookup by name and size with system fonts first and `.ttf` files as fallback
//! - Anti-aliased rasterization through cosmic-text
//! - Dirty-rectangle tracking so only changed pixels are uploaded
//! - An optional edge recoloring pass for text drawn on a background that will be keyed out
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glint_core::geometry::Size;
//! use glint_core::math::Vec2;
//! use glint_render::{GraphicsContext, Rgba8};
//! use glint_text::{FontCache, TextSurface};
//!
//! let context = GraphicsContext::new_owned_sync().unwrap();
//! let mut fonts = FontCache::with_system_fonts();
//! let font = fonts.resolve("Arial", 16.0).unwrap();
//!
//! let mut surface = TextSurface::new(context, Size::new(128, 32)).unwrap();
//! surface.clear(Rgba8::BLACK);
//! surface.draw_string("Score: 42", &font, Rgba8::WHITE, Vec2::ZERO, true);
//!
//! // Inside a render pass:
//! // surface.draw(&mut quad_pass);
//! ```

pub mod cache;
pub mod dirty;
pub mod error;
pub mod font;
pub mod postprocess;
pub mod renderer;
pub mod surface;

pub use cache::{FontCache, FontCacheConfig, ResolveStrategy};
pub use dirty::DirtyRegion;
pub use error::{TextError, TextResult};
pub use font::{FontCollection, FontHandle, FontSource};
pub use postprocess::{recolor_edges, recolor_pixel};
pub use renderer::{TEXTURE_FORMAT, TextSurface, TextSurfaceDescriptor};
pub use surface::{PixelFormat, Surface};
