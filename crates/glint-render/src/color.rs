/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// ```
/// use glint_render::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let from_hex = Color::from_hex(0xFF8800);
/// assert_eq!(from_hex.to_rgba8().r, 0xFF);
/// ```
///
/// The struct is `#[repr(C)]` and implements `bytemuck::Pod`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Quantize to 8 bits per channel, clamping out-of-range components.
    pub fn to_rgba8(self) -> Rgba8 {
        fn quantize(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Rgba8::new(quantize(self.r), quantize(self.g), quantize(self.b), quantize(self.a))
    }

    /// Convert to the equivalent `wgpu::Color` (f64 components).
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgba8> for Color {
    fn from(c: Rgba8) -> Self {
        Self::from_rgba_u8(c.r, c.g, c.b, c.a)
    }
}

/// An 8-bit-per-channel, non-premultiplied RGBA color.
///
/// This is the color type used at the pixel level: clearing a surface and
/// recoloring glyph edges work on exact byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels in B, G, R, A memory order.
    pub const fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    pub const fn from_bgra(bgra: [u8; 4]) -> Self {
        Self::new(bgra[2], bgra[1], bgra[0], bgra[3])
    }
}

impl From<Color> for Rgba8 {
    fn from(c: Color) -> Self {
        c.to_rgba8()
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgba8_rounds_and_clamps() {
        assert_eq!(Color::WHITE.to_rgba8(), Rgba8::WHITE);
        assert_eq!(Color::rgba(2.0, -1.0, 0.5, 1.0).to_rgba8(), Rgba8::new(255, 0, 128, 255));
    }

    #[test]
    fn test_bgra_order() {
        let c = Rgba8::new(1, 2, 3, 4);
        assert_eq!(c.to_bgra(), [3, 2, 1, 4]);
        assert_eq!(Rgba8::from_bgra(c.to_bgra()), c);
    }

    #[test]
    fn test_hex_round_trip_to_bytes() {
        let c: Rgba8 = Color::from_hex(0x12AB34).into();
        assert_eq!(c, Rgba8::rgb(0x12, 0xAB, 0x34));
    }
}
