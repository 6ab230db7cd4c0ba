//! CPU-side pixel buffer that text is rasterized into.

use glint_core::geometry::{Rect, Size};
use glint_render::Rgba8;

/// Memory layout of a [`Surface`] pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 32 bits per pixel, bytes B, G, R, A.
    #[default]
    Bgra8,
    /// 24 bits per pixel, bytes B, G, R. Treated as opaque.
    Bgr8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 => 4,
            PixelFormat::Bgr8 => 3,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Bgra8)
    }
}

/// An owned 2D pixel buffer, row-major with a top-left origin.
///
/// Rows are tightly packed: `stride == width * bytes_per_pixel`.
#[derive(Debug, Clone)]
pub struct Surface {
    size: Size<u32>,
    format: PixelFormat,
    stride: usize,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a zeroed surface. `size` must be non-empty; the renderer
    /// validates this before calling.
    pub fn new(size: Size<u32>, format: PixelFormat) -> Self {
        let stride = size.width as usize * format.bytes_per_pixel();
        Self {
            size,
            format,
            stride,
            data: vec![0; stride * size.height as usize],
        }
    }

    pub fn size(&self) -> Size<u32> {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw bytes in the surface's native channel order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bounds(&self) -> Rect<u32> {
        Rect::from_size(self.size)
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(y as usize * self.stride + x as usize * self.format.bytes_per_pixel())
    }

    /// Read a pixel. 24-bit surfaces report an alpha of 255.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let i = self.offset(x, y)?;
        let p = &self.data[i..i + self.format.bytes_per_pixel()];
        let a = if self.format.has_alpha() { p[3] } else { 255 };
        Some(Rgba8::new(p[2], p[1], p[0], a))
    }

    /// Overwrite a pixel without blending. Returns `false` when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        let bpp = self.format.bytes_per_pixel();
        self.data[i..i + bpp].copy_from_slice(&color.to_bgra()[..bpp]);
        true
    }

    /// Mutable B,G,R,A bytes of a pixel on a 32-bit surface.
    pub(crate) fn bgra_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if !self.format.has_alpha() {
            return None;
        }
        let i = self.offset(x, y)?;
        Some(&mut self.data[i..i + 4])
    }

    /// Overwrite every pixel with `color`.
    ///
    /// Only 32-bit BGRA surfaces are supported; on other formats nothing is
    /// written and `false` is returned.
    pub fn fill(&mut self, color: Rgba8) -> bool {
        if self.format != PixelFormat::Bgra8 {
            return false;
        }
        let bgra = color.to_bgra();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&bgra);
        }
        true
    }

    /// Source-over blend `color` (straight alpha) onto the pixel at `(x, y)`.
    ///
    /// Coordinates outside the surface are ignored and return `false`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba8) -> bool {
        if x < 0 || y < 0 || color.a == 0 {
            return false;
        }
        let Some(i) = self.offset(x as u32, y as u32) else {
            return false;
        };

        let a = color.a as u32;
        let inv = 255 - a;
        let blend = |src: u8, dst: u8| ((src as u32 * a + dst as u32 * inv + 127) / 255) as u8;

        let px = &mut self.data[i..i + self.format.bytes_per_pixel()];
        px[0] = blend(color.b, px[0]);
        px[1] = blend(color.g, px[1]);
        px[2] = blend(color.r, px[2]);
        if self.format.has_alpha() {
            px[3] = (a + (px[3] as u32 * inv + 127) / 255).min(255) as u8;
        }
        true
    }

    /// Copy `rect` out as tightly packed RGBA rows, ready for an `Rgba8Unorm`
    /// texture. 24-bit surfaces are widened with an opaque alpha.
    ///
    /// `rect` is clipped to the surface first.
    pub fn read_rgba(&self, rect: Rect<u32>) -> Vec<u8> {
        let rect = rect.intersect(self.bounds());
        let bpp = self.format.bytes_per_pixel();
        let mut out = Vec::with_capacity(rect.width as usize * rect.height as usize * 4);

        for y in rect.y..rect.y + rect.height {
            let start = y as usize * self.stride + rect.x as usize * bpp;
            let row = &self.data[start..start + rect.width as usize * bpp];
            for px in row.chunks_exact(bpp) {
                let a = if self.format.has_alpha() { px[3] } else { 255 };
                out.extend_from_slice(&[px[2], px[1], px[0], a]);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_zeroed() {
        let s = Surface::new(Size::new(4, 2), PixelFormat::Bgra8);
        assert_eq!(s.stride(), 16);
        assert_eq!(s.data().len(), 32);
        assert!(s.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_writes_bgra_order() {
        let mut s = Surface::new(Size::new(3, 3), PixelFormat::Bgra8);
        assert!(s.fill(Rgba8::new(10, 20, 30, 40)));
        for px in s.data().chunks_exact(4) {
            assert_eq!(px, &[30, 20, 10, 40]);
        }
    }

    #[test]
    fn test_fill_rejects_24_bit() {
        let mut s = Surface::new(Size::new(2, 2), PixelFormat::Bgr8);
        assert!(!s.fill(Rgba8::WHITE));
        assert!(s.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_blend_pixel_extremes() {
        let mut s = Surface::new(Size::new(2, 1), PixelFormat::Bgra8);
        s.fill(Rgba8::BLACK);

        assert!(s.blend_pixel(0, 0, Rgba8::WHITE));
        assert_eq!(s.pixel(0, 0), Some(Rgba8::WHITE));

        assert!(!s.blend_pixel(1, 0, Rgba8::new(255, 255, 255, 0)));
        assert_eq!(s.pixel(1, 0), Some(Rgba8::BLACK));
    }

    #[test]
    fn test_blend_pixel_half_coverage() {
        let mut s = Surface::new(Size::new(1, 1), PixelFormat::Bgra8);
        s.fill(Rgba8::new(0, 0, 0, 0));
        s.blend_pixel(0, 0, Rgba8::new(200, 100, 0, 128));

        let p = s.pixel(0, 0).unwrap();
        assert_eq!(p.r, 100);
        assert_eq!(p.g, 50);
        assert_eq!(p.b, 0);
        assert_eq!(p.a, 128);
    }

    #[test]
    fn test_blend_pixel_out_of_bounds() {
        let mut s = Surface::new(Size::new(2, 2), PixelFormat::Bgra8);
        assert!(!s.blend_pixel(-1, 0, Rgba8::WHITE));
        assert!(!s.blend_pixel(2, 0, Rgba8::WHITE));
        assert!(!s.blend_pixel(0, 2, Rgba8::WHITE));
    }

    #[test]
    fn test_read_rgba_converts_sub_rect() {
        let mut s = Surface::new(Size::new(3, 2), PixelFormat::Bgra8);
        s.set_pixel(1, 1, Rgba8::new(1, 2, 3, 4));
        s.set_pixel(2, 1, Rgba8::new(5, 6, 7, 8));

        let rgba = s.read_rgba(Rect::new(1, 1, 2, 1));
        assert_eq!(rgba, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_read_rgba_widens_24_bit() {
        let mut s = Surface::new(Size::new(1, 1), PixelFormat::Bgr8);
        s.set_pixel(0, 0, Rgba8::new(9, 8, 7, 0));
        assert_eq!(s.pixel(0, 0), Some(Rgba8::new(9, 8, 7, 255)));
        assert_eq!(s.read_rgba(Rect::new(0, 0, 1, 1)), vec![9, 8, 7, 255]);
    }
}
