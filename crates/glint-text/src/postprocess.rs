//! Glyph edge recoloring.
//!
//! A rasterizer blends anti-aliased glyph edges toward whatever was behind
//! them. When that background is later treated as transparent, the edges
//! carry a tint of the old background. This pass pulls every touched pixel
//! back toward the exact text color and moves the "how far from the text
//! color was it" information into alpha instead.
//!
//! Per pixel, with `t` the target color:
//!
//! ```text
//! dB, dG, dR = |p - t|            per channel
//! dM         = max(dB, dG, dR)
//! B' = min(255, t.B + dR/3 + dG/3)
//! G' = min(255, t.G + dR/3 + dB/3)
//! R' = min(255, t.R + dG/3 + dB/3)
//! A' = 255 - dM
//! ```
//!
//! Pixels whose B, G, R match the background sample exactly are skipped.

use glint_core::geometry::Rect;
use glint_core::profiling::profile_function;
use glint_render::Rgba8;

use crate::surface::{PixelFormat, Surface};

/// Recolor a single pixel given as `[B, G, R, A]`. The input alpha is ignored.
#[inline]
pub fn recolor_pixel(bgra: [u8; 4], target: Rgba8) -> [u8; 4] {
    let delta_b = bgra[0].abs_diff(target.b) as u32;
    let delta_g = bgra[1].abs_diff(target.g) as u32;
    let delta_r = bgra[2].abs_diff(target.r) as u32;
    let delta_max = delta_b.max(delta_g).max(delta_r);

    let b = (target.b as u32 + delta_r / 3 + delta_g / 3).min(255);
    let g = (target.g as u32 + delta_r / 3 + delta_b / 3).min(255);
    let r = (target.r as u32 + delta_g / 3 + delta_b / 3).min(255);
    let a = 255 - delta_max;

    [b as u8, g as u8, r as u8, a as u8]
}

/// Recolor every non-background pixel of `rect` toward `target`.
///
/// `background` is compared on B, G, R only; matching pixels are left
/// untouched including their alpha. `rect` is clipped to the surface.
/// Only 32-bit surfaces are processed; other formats are left unchanged.
///
/// Returns the number of pixels rewritten.
pub fn recolor_edges(
    surface: &mut Surface,
    rect: Rect<u32>,
    background: Rgba8,
    target: Rgba8,
) -> usize {
    profile_function!();
    if surface.format() != PixelFormat::Bgra8 {
        tracing::debug!(
            "Skipping edge recolor on {:?} surface, 32-bit BGRA required",
            surface.format()
        );
        return 0;
    }

    let rect = rect.intersect(surface.bounds());
    let mut rewritten = 0;

    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let Some(px) = surface.bgra_mut(x, y) else {
                continue;
            };
            if px[0] == background.b && px[1] == background.g && px[2] == background.r {
                continue;
            }

            let recolored = recolor_pixel([px[0], px[1], px[2], px[3]], target);
            px.copy_from_slice(&recolored);
            rewritten += 1;
        }
    }

    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::geometry::Size;

    #[test]
    fn test_exact_target_becomes_opaque_target() {
        let target = Rgba8::rgb(200, 100, 50);
        assert_eq!(recolor_pixel(target.to_bgra(), target), [50, 100, 200, 255]);
    }

    #[test]
    fn test_formula_values() {
        // White text, pixel half-way to black: B,G,R = 128.
        let out = recolor_pixel([128, 128, 128, 255], Rgba8::WHITE);
        // delta = 127 each, /3 = 42; 255 + 84 clamps.
        assert_eq!(out, [255, 255, 255, 128]);

        let out = recolor_pixel([0, 30, 90, 7], Rgba8::rgb(0, 0, 0));
        // dB=0 dG=30 dR=90, dM=90
        // B = 0 + 30 + 10, G = 0 + 30 + 0, R = 0 + 10 + 0
        assert_eq!(out, [40, 30, 10, 165]);
    }

    fn max_delta(p: &[u8; 4], target: Rgba8) -> u8 {
        let delta_b = p[0].abs_diff(target.b);
        let delta_g = p[1].abs_diff(target.g);
        let delta_r = p[2].abs_diff(target.r);
        delta_b.max(delta_g).max(delta_r)
    }

    #[test]
    fn test_alpha_monotonic_in_max_delta() {
        let target = Rgba8::rgb(240, 20, 60);
        let pixels: Vec<[u8; 4]> = (0..=255u8)
            .step_by(5)
            .map(|v| [v, v / 2, 255 - v, 0])
            .collect();

        for p1 in &pixels {
            for p2 in &pixels {
                if max_delta(p1, target) < max_delta(p2, target) {
                    assert!(recolor_pixel(*p1, target)[3] >= recolor_pixel(*p2, target)[3]);
                }
            }
        }
    }

    #[test]
    fn test_background_pixels_untouched() {
        let background = Rgba8::new(0, 0, 0, 255);
        let mut surface = Surface::new(Size::new(4, 4), PixelFormat::Bgra8);
        surface.fill(background);
        surface.set_pixel(1, 1, Rgba8::new(128, 128, 128, 255));
        let before = surface.data().to_vec();

        let bounds = surface.bounds();
        let rewritten = recolor_edges(&mut surface, bounds, background, Rgba8::WHITE);

        assert_eq!(rewritten, 1);
        for y in 0..4 {
            for x in 0..4 {
                let i = (y * 4 + x) * 4;
                if (x, y) == (1, 1) {
                    assert_eq!(&surface.data()[i..i + 4], &[255, 255, 255, 128]);
                } else {
                    assert_eq!(&surface.data()[i..i + 4], &before[i..i + 4]);
                }
            }
        }
    }

    #[test]
    fn test_skip_ignores_alpha_of_background() {
        let mut surface = Surface::new(Size::new(1, 1), PixelFormat::Bgra8);
        surface.set_pixel(0, 0, Rgba8::new(5, 6, 7, 9));
        let bounds = surface.bounds();
        let rewritten = recolor_edges(
            &mut surface,
            bounds,
            Rgba8::new(5, 6, 7, 255),
            Rgba8::WHITE,
        );
        assert_eq!(rewritten, 0);
        assert_eq!(surface.pixel(0, 0), Some(Rgba8::new(5, 6, 7, 9)));
    }

    #[test]
    fn test_rect_is_clipped() {
        let mut surface = Surface::new(Size::new(2, 2), PixelFormat::Bgra8);
        surface.fill(Rgba8::rgb(9, 9, 9));
        let rewritten = recolor_edges(
            &mut surface,
            Rect::new(1, 1, 100, 100),
            Rgba8::BLACK,
            Rgba8::WHITE,
        );
        assert_eq!(rewritten, 1);
    }

    #[test]
    fn test_24_bit_surface_is_left_alone() {
        let mut surface = Surface::new(Size::new(2, 2), PixelFormat::Bgr8);
        surface.set_pixel(0, 0, Rgba8::rgb(100, 100, 100));
        let before = surface.data().to_vec();

        let bounds = surface.bounds();
        let rewritten = recolor_edges(&mut surface, bounds, Rgba8::BLACK, Rgba8::WHITE);
        assert_eq!(rewritten, 0);
        assert_eq!(surface.data(), &before[..]);
    }
}
