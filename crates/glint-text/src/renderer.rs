//! Offscreen text surface: a CPU pixel buffer mirrored into a GPU texture.
//!
//! Text is rasterized on the CPU. Every write grows a dirty rectangle, and
//! only that rectangle is copied to the texture, lazily, the next time the
//! surface is drawn.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glint_core::geometry::Size;
//! use glint_core::math::Vec2;
//! use glint_render::{GraphicsContext, Rgba8};
//! use glint_text::{FontCache, TextSurface};
//!
//! let context = GraphicsContext::new_owned_sync().unwrap();
//! let mut fonts = FontCache::with_system_fonts();
//! let font = fonts.resolve("DejaVu Sans", 14.0).unwrap();
//!
//! let mut surface = TextSurface::new(context, Size::new(256, 32)).unwrap();
//! surface.clear(Rgba8::TRANSPARENT);
//! surface.draw_string("Hello", &font, Rgba8::WHITE, Vec2::new(4.0, 4.0), true);
//! // surface.draw(&mut quad_pass);
//! ```

use std::sync::Arc;

use cosmic_text::SwashCache;
use glint_core::geometry::{Rect, Size};
use glint_core::math::Vec2;
use glint_core::profiling::{profile_function, profile_scope};
use glint_render::wgpu;
use glint_render::{
    BlendMode, GpuTexture, QuadFilter, QuadPass, RenderContext, Rgba8, ScopedBlend,
    TextureRegion, TexturedQuad,
};

use crate::dirty::DirtyRegion;
use crate::error::{TextError, TextResult};
use crate::font::FontHandle;
use crate::postprocess;
use crate::surface::{PixelFormat, Surface};

/// Texture format backing every text surface. Pixels are converted from the
/// surface's BGRA layout on upload.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Construction options for a [`TextSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextSurfaceDescriptor {
    pub size: Size<u32>,
    pub format: PixelFormat,
    /// Sampling filter used when the surface is drawn.
    pub filter: QuadFilter,
    pub label: Option<String>,
}

impl TextSurfaceDescriptor {
    pub fn new(size: Size<u32>) -> Self {
        Self {
            size,
            format: PixelFormat::default(),
            filter: QuadFilter::default(),
            label: None,
        }
    }

    pub fn format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn filter(mut self, filter: QuadFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// An offscreen surface that text is drawn into and that can be composited
/// onto a render target as a single textured quad.
///
/// The pixel buffer and its texture are created together and released
/// together when the surface is dropped.
pub struct TextSurface {
    context: Arc<dyn RenderContext>,
    surface: Surface,
    texture: GpuTexture,
    dirty: DirtyRegion,
    swash_cache: SwashCache,
    filter: QuadFilter,
    uploads: u64,
}

impl TextSurface {
    /// Create a 32-bit BGRA surface of `size` pixels.
    pub fn new(context: Arc<dyn RenderContext>, size: Size<u32>) -> TextResult<Self> {
        Self::with_descriptor(context, TextSurfaceDescriptor::new(size))
    }

    /// Create a surface from a full descriptor.
    ///
    /// Fails without allocating anything when the size is zero, exceeds the
    /// context's texture limit, or the context is not current.
    pub fn with_descriptor(
        context: Arc<dyn RenderContext>,
        descriptor: TextSurfaceDescriptor,
    ) -> TextResult<Self> {
        let size = descriptor.size;
        if size.is_empty() {
            return Err(TextError::InvalidArgument(format!(
                "surface size must be non-zero, got {}x{}",
                size.width, size.height
            )));
        }

        let max = context.max_texture_dimension_2d();
        if size.width > max || size.height > max {
            return Err(TextError::InvalidArgument(format!(
                "surface size {}x{} exceeds the texture limit of {}",
                size.width, size.height, max
            )));
        }

        if !context.is_current() {
            return Err(TextError::InvalidContext);
        }

        let texture = context.create_texture(&wgpu::TextureDescriptor {
            label: descriptor.label.as_deref(),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        tracing::debug!(
            "Created {}x{} {:?} text surface{}",
            size.width,
            size.height,
            descriptor.format,
            descriptor
                .label
                .as_deref()
                .map(|l| format!(" '{}'", l))
                .unwrap_or_default()
        );

        Ok(Self {
            context,
            surface: Surface::new(size, descriptor.format),
            texture,
            dirty: DirtyRegion::new(size),
            swash_cache: SwashCache::new(),
            filter: descriptor.filter,
            uploads: 0,
        })
    }

    pub fn size(&self) -> Size<u32> {
        self.surface.size()
    }

    pub fn format(&self) -> PixelFormat {
        self.surface.format()
    }

    /// Read-only access to the CPU pixels.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty
    }

    pub fn texture(&self) -> &GpuTexture {
        &self.texture
    }

    /// Number of texture uploads performed so far.
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Overwrite every pixel with `color` and mark the whole surface dirty.
    ///
    /// Only 32-bit BGRA surfaces can be cleared; on other formats this does nothing.
    pub fn clear(&mut self, color: Rgba8) {
        profile_function!();
        if !self.surface.fill(color) {
            tracing::debug!(
                "Ignoring clear on {:?} surface, 32-bit BGRA required",
                self.surface.format()
            );
            return;
        }
        self.dirty.mark_all();
    }

    /// Measure `text` as it would be laid out by [`TextSurface::draw_string`].
    pub fn measure_string(&self, text: &str, font: &FontHandle) -> Size<f32> {
        font.measure(text)
    }

    /// Rasterize `text` at `position` (top-left of the first line) in `color`.
    ///
    /// When `postprocess` is set, glyph edges inside the text box are
    /// recolored toward `color` with the edge coverage moved into alpha.
    /// The background for that pass is the pixel at `(0, 0)` before drawing,
    /// so the surface should have been cleared to a uniform color.
    ///
    /// Returns the rectangle marked dirty, empty when nothing landed on the surface.
    pub fn draw_string(
        &mut self,
        text: &str,
        font: &FontHandle,
        color: Rgba8,
        position: Vec2,
        postprocess: bool,
    ) -> Rect<u32> {
        profile_function!();
        let background = self.surface.pixel(0, 0).unwrap_or_default();

        let touched = {
            profile_scope!("rasterize");
            font.rasterize(text, color, position, &mut self.swash_cache, &mut self.surface)
        };

        let measured = font.measure(text);
        let text_rect = Rect::new(position.x, position.y, measured.width, measured.height)
            .round_out()
            .clamp_to(self.surface.size());

        if postprocess && !text_rect.is_empty() {
            postprocess::recolor_edges(&mut self.surface, text_rect, background, color);
        }

        let marked = text_rect.union(touched.unwrap_or(Rect::EMPTY));
        let marked = self.dirty.add(marked);
        tracing::trace!("draw_string '{}' marked {:?} dirty", text, marked);
        marked
    }

    /// Copy the dirty rectangle to the texture if anything changed.
    ///
    /// Returns whether an upload happened. With no current context the
    /// upload is skipped and the region stays dirty.
    pub fn upload_if_dirty(&mut self) -> bool {
        profile_function!();
        if self.dirty.is_empty() {
            return false;
        }
        if !self.context.is_current() {
            tracing::warn!("Skipping text surface upload, render context is not current");
            return false;
        }
        let Some(rect) = self.dirty.take() else {
            return false;
        };

        let pixels = self.surface.read_rgba(rect);
        self.context.write_texture(
            &self.texture,
            TextureRegion::new(rect.x, rect.y, rect.width, rect.height),
            rect.width * 4,
            &pixels,
        );
        self.uploads += 1;
        tracing::trace!("Uploaded text surface region {:?}", rect);
        true
    }

    /// Upload pending changes and draw the surface as one alpha-blended quad
    /// at `(0, 0)` with its pixel size. The pass's blend mode is restored
    /// afterwards, also when drawing panics.
    pub fn draw<P: QuadPass + ?Sized>(&mut self, pass: &mut P) {
        profile_function!();
        if !self.context.is_current() {
            tracing::warn!("Skipping text surface draw, render context is not current");
            return;
        }
        self.upload_if_dirty();

        let size = self.surface.size();
        let mut pass = ScopedBlend::new(pass, BlendMode::Alpha);
        pass.draw_textured_quad(
            &self.texture,
            TexturedQuad::full(size.width as f32, size.height as f32, self.filter),
        );
    }
}

impl Drop for TextSurface {
    fn drop(&mut self) {
        if self.context.is_current() {
            self.context.destroy_texture(&self.texture);
        } else {
            tracing::warn!(
                "Context not current while dropping {}x{} text surface, abandoning its texture",
                self.surface.width(),
                self.surface.height()
            );
        }
    }
}

impl std::fmt::Debug for TextSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSurface")
            .field("size", &self.surface.size())
            .field("format", &self.surface.format())
            .field("dirty", &self.dirty.rect())
            .field("uploads", &self.uploads)
            .finish()
    }
}
