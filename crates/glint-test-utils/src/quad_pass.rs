//! Trait abstracting a render pass that draws textured screen-space quads.

use std::ops::{Deref, DerefMut};

use crate::gpu_types::GpuTexture;

/// Color blending applied when a quad is written to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Source replaces destination.
    #[default]
    Replace,
    /// Straight (non-premultiplied) source-over blending.
    Alpha,
    /// Premultiplied source-over blending.
    PremultipliedAlpha,
}

/// Texture sampling filter used for a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuadFilter {
    Nearest,
    #[default]
    Linear,
}

/// A textured quad in 2D screen coordinates (pixels, top-left origin).
///
/// `uv` maps the quad corners onto the texture, also top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    /// `[x, y, width, height]` in target pixels.
    pub rect: [f32; 4],
    /// `[u0, v0, u1, v1]` texture coordinates of the top-left and bottom-right corners.
    pub uv: [f32; 4],
    pub filter: QuadFilter,
}

impl TexturedQuad {
    /// Quad covering `(0,0)-(width,height)` that maps the full texture.
    pub fn full(width: f32, height: f32, filter: QuadFilter) -> Self {
        Self {
            rect: [0.0, 0.0, width, height],
            uv: [0.0, 0.0, 1.0, 1.0],
            filter,
        }
    }
}

/// A pass that can draw textured quads with a switchable blend mode.
///
/// The blend mode is pass state: it applies to every quad drawn until it is
/// changed again. Callers that change it for their own draws restore the
/// previous value afterwards, usually through [`ScopedBlend`].
pub trait QuadPass {
    fn blend_mode(&self) -> BlendMode;

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn draw_textured_quad(&mut self, texture: &GpuTexture, quad: TexturedQuad);
}

/// Sets a blend mode on a pass and restores the previous mode when dropped,
/// including while unwinding from a panic.
pub struct ScopedBlend<'a, P: QuadPass + ?Sized> {
    pass: &'a mut P,
    saved: BlendMode,
}

impl<'a, P: QuadPass + ?Sized> ScopedBlend<'a, P> {
    pub fn new(pass: &'a mut P, mode: BlendMode) -> Self {
        let saved = pass.blend_mode();
        pass.set_blend_mode(mode);
        Self { pass, saved }
    }

    /// Mode that will be restored on drop.
    pub fn saved(&self) -> BlendMode {
        self.saved
    }
}

impl<P: QuadPass + ?Sized> Deref for ScopedBlend<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.pass
    }
}

impl<P: QuadPass + ?Sized> DerefMut for ScopedBlend<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.pass
    }
}

impl<P: QuadPass + ?Sized> Drop for ScopedBlend<'_, P> {
    fn drop(&mut self) {
        self.pass.set_blend_mode(self.saved);
    }
}
