//! Fitting the logical screen into the window.
//!
//! The logical screen is `screen_size` pixels, each drawn as `pixel_size`
//! window pixels. When the window's aspect ratio differs, the image is
//! letterboxed: scaled to the largest size that fits and centered.

use crate::math::{Vec2, Vi2d};

/// Placement of the logical screen inside the window, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub pos: Vi2d,
    pub size: Vi2d,
}

impl Viewport {
    /// Computes the letterboxed viewport for the given window size.
    pub fn fit(screen_size: Vi2d, pixel_size: Vi2d, window_size: Vi2d) -> Self {
        let ww = screen_size.x * pixel_size.x;
        let wh = screen_size.y * pixel_size.y;
        if ww <= 0 || wh <= 0 {
            return Self {
                pos: Vi2d::ZERO,
                size: window_size,
            };
        }
        let aspect = ww as f32 / wh as f32;

        let mut size = Vi2d::new(window_size.x, (window_size.x as f32 / aspect) as i32);
        if size.y > window_size.y {
            size.y = window_size.y;
            size.x = (size.y as f32 * aspect) as i32;
        }

        let pos = Vi2d::new((window_size.x - size.x) / 2, (window_size.y - size.y) / 2);
        Self { pos, size }
    }

    /// Maps a window-space position to logical pixel space, clamped to the screen.
    pub fn window_to_screen(&self, window_pos: Vi2d, screen_size: Vi2d) -> Vi2d {
        let local = window_pos - self.pos;
        let map = |v: i32, extent: i32, screen: i32| -> i32 {
            if extent <= 0 {
                return 0;
            }
            let mapped = (v as f32 / extent as f32 * screen as f32) as i32;
            mapped.min(screen - 1).max(0)
        };
        Vi2d::new(
            map(local.x, self.size.x, screen_size.x),
            map(local.y, self.size.y, screen_size.y),
        )
    }

    /// Size of one logical pixel in normalized device units (`2 / screen`).
    pub fn ndc_pixel(screen_size: Vi2d) -> Vec2 {
        Vec2::new(2.0, 2.0).scale(screen_size.to_vec2().recip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_fit_fills_window() {
        let vp = Viewport::fit(Vi2d::new(160, 120), Vi2d::new(4, 4), Vi2d::new(640, 480));
        assert_eq!(vp.pos, Vi2d::ZERO);
        assert_eq!(vp.size, Vi2d::new(640, 480));
    }

    #[test]
    fn wide_window_is_pillarboxed() {
        let vp = Viewport::fit(Vi2d::new(160, 120), Vi2d::new(4, 4), Vi2d::new(1000, 480));
        assert_eq!(vp.size, Vi2d::new(640, 480));
        assert_eq!(vp.pos, Vi2d::new(180, 0));
    }

    #[test]
    fn tall_window_is_letterboxed() {
        let vp = Viewport::fit(Vi2d::new(160, 120), Vi2d::new(4, 4), Vi2d::new(640, 880));
        assert_eq!(vp.size, Vi2d::new(640, 480));
        assert_eq!(vp.pos, Vi2d::new(0, 200));
    }

    #[test]
    fn non_square_pixels_change_aspect() {
        // 100x100 screen with 2x1 pixels is 200x100 worth of window
        let vp = Viewport::fit(Vi2d::new(100, 100), Vi2d::new(2, 1), Vi2d::new(400, 400));
        assert_eq!(vp.size, Vi2d::new(400, 200));
        assert_eq!(vp.pos, Vi2d::new(0, 100));
    }

    #[test]
    fn window_to_screen_maps_and_clamps() {
        let screen = Vi2d::new(160, 120);
        let vp = Viewport::fit(screen, Vi2d::new(4, 4), Vi2d::new(1000, 480));

        assert_eq!(vp.window_to_screen(Vi2d::new(180, 0), screen), Vi2d::ZERO);
        assert_eq!(vp.window_to_screen(Vi2d::new(184, 8), screen), Vi2d::new(1, 2));
        assert_eq!(vp.window_to_screen(Vi2d::new(0, -5), screen), Vi2d::ZERO);
        assert_eq!(
            vp.window_to_screen(Vi2d::new(999, 479), screen),
            Vi2d::new(159, 119)
        );
    }

    #[test]
    fn ndc_pixel_size() {
        let p = Viewport::ndc_pixel(Vi2d::new(160, 120));
        assert_relative_eq!(p.x, 2.0 / 160.0);
        assert_relative_eq!(p.y, 2.0 / 120.0);
    }
}
