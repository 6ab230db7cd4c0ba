//! Trait abstracting the GPU operations the text surface needs.

use crate::gpu_types::GpuTexture;
use wgpu::TextureDescriptor;

/// A sub-rectangle of a 2D texture, in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Trait abstracting GPU texture creation, upload and release.
///
/// Methods take `&self` and return owned wrapper types, so a single context
/// can be shared behind an `Arc<dyn RenderContext>` and mocks can record
/// calls through interior mutability.
///
/// # Current context
///
/// [`RenderContext::is_current`] reports whether the context can still
/// service GPU work. Creating resources requires a current context; releasing
/// them without one is tolerated by callers (the resource is abandoned and
/// reclaimed when the context itself goes away).
pub trait RenderContext: Send + Sync {
    /// Whether the context is usable for GPU work on this thread.
    fn is_current(&self) -> bool;

    /// Largest width/height accepted for a 2D texture.
    fn max_texture_dimension_2d(&self) -> u32;

    /// Create a GPU texture. Contents are undefined until the first write.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Upload tightly packed texel rows into `region` of `texture`.
    ///
    /// `data` holds `region.height` rows of `bytes_per_row` bytes.
    fn write_texture(
        &self,
        texture: &GpuTexture,
        region: TextureRegion,
        bytes_per_row: u32,
        data: &[u8],
    );

    /// Release a texture's GPU storage.
    fn destroy_texture(&self, texture: &GpuTexture);
}
