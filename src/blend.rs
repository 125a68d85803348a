//! How pixel drawing combines a new colour with what is already there.

use crate::colors::Pixel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelMode {
    /// Overwrite, no transparency.
    #[default]
    Normal,
    /// Skip any pixel whose alpha is below 255.
    Mask,
    /// Blend by source alpha scaled by the blend factor.
    Alpha,
    /// Delegate to the installed [`PixelBlend`].
    Custom,
}

/// User-supplied blend for [`PixelMode::Custom`].
pub trait PixelBlend {
    /// Returns the colour to store at `(x, y)` given the incoming `src` and
    /// the current `dst`.
    fn blend(&mut self, x: i32, y: i32, src: Pixel, dst: Pixel) -> Pixel;
}

impl<F> PixelBlend for F
where
    F: FnMut(i32, i32, Pixel, Pixel) -> Pixel,
{
    fn blend(&mut self, x: i32, y: i32, src: Pixel, dst: Pixel) -> Pixel {
        self(x, y, src, dst)
    }
}

/// Alpha-blends `src` over `dst`. The result is always opaque.
pub fn alpha_blend(src: Pixel, dst: Pixel, blend_factor: f32) -> Pixel {
    let a = (src.a as f32 / 255.0) * blend_factor;
    let c = 1.0 - a;
    let mix = |s: u8, d: u8| (a * s as f32 + c * d as f32).round() as u8;
    Pixel::rgb(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, BLANK, RED, WHITE};

    #[test]
    fn opaque_source_replaces() {
        assert_eq!(alpha_blend(RED, WHITE, 1.0), RED);
    }

    #[test]
    fn transparent_source_keeps_destination() {
        assert_eq!(alpha_blend(BLANK, WHITE, 1.0), WHITE);
        assert_eq!(alpha_blend(RED, WHITE, 0.0), WHITE);
    }

    #[test]
    fn half_alpha_mixes() {
        let half_white = Pixel::rgba(255, 255, 255, 128);
        let out = alpha_blend(half_white, BLACK, 1.0);
        assert_eq!(out, Pixel::rgb(128, 128, 128));
    }

    #[test]
    fn closures_are_blends() {
        let mut invert = |_x: i32, _y: i32, src: Pixel, _dst: Pixel| {
            Pixel::rgb(255 - src.r, 255 - src.g, 255 - src.b)
        };
        assert_eq!(invert.blend(0, 0, WHITE, RED), BLACK);
    }
}
