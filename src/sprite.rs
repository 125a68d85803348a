//! Owned 2D pixel grid.
//!
//! A [`Sprite`] is the unit of pixel storage: every layer draws into one,
//! decals upload one to the backend, and the font sheet is one. Access is
//! bounds-checked; out-of-range reads return [`Pixel::DEFAULT`] and
//! out-of-range writes are ignored.

use std::path::Path;

use tracing::error;

use crate::colors::Pixel;
use crate::error::EngineResult;

/// Addressing mode used by [`Sprite::sample`] and [`Sprite::sample_bilinear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleMode {
    /// Coordinates outside `[0, 1)` clamp to the edge texel.
    #[default]
    Normal,
    /// Coordinates wrap, tiling the sprite.
    Periodic,
}

/// A `width x height` grid of RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    sample_mode: SampleMode,
}

/// Allocates `len` zeroed pixels or aborts the process.
///
/// Running out of memory for a pixel grid is unrecoverable for the engine.
fn alloc_pixels(width: u32, height: u32) -> Vec<Pixel> {
    let Some(len) = (width as usize).checked_mul(height as usize) else {
        error!(width, height, "sprite dimensions overflow");
        std::process::abort();
    };
    let mut pixels = Vec::new();
    if pixels.try_reserve_exact(len).is_err() {
        error!(width, height, "failed to allocate sprite pixel data");
        std::process::abort();
    }
    pixels.resize(len, Pixel::rgba(0, 0, 0, 0));
    pixels
}

impl Sprite {
    /// Creates a zero-filled sprite (every channel 0, including alpha).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: alloc_pixels(width, height),
            sample_mode: SampleMode::Normal,
        }
    }

    /// Loads an image file (PNG, JPG, etc.) into a sprite.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Pixel::rgba(r, g, b, a)
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
            sample_mode: SampleMode::Normal,
        })
    }

    /// Consumes this sprite and returns a fresh zeroed one of the new size.
    ///
    /// The sample mode carries over; pixel contents do not.
    pub fn resized(self, width: u32, height: u32) -> Self {
        let mut sprite = Self::new(width, height);
        sprite.sample_mode = self.sample_mode;
        sprite
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sample_mode(&self) -> SampleMode {
        self.sample_mode
    }

    pub fn set_sample_mode(&mut self, mode: SampleMode) {
        self.sample_mode = mode;
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Returns the pixel at `(x, y)` or [`Pixel::DEFAULT`] when out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        self.index(x, y)
            .map_or(Pixel::DEFAULT, |idx| self.pixels[idx])
    }

    /// Writes the pixel at `(x, y)`. Returns `false` without touching the
    /// buffer when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, p: Pixel) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.pixels[idx] = p;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, p: Pixel) {
        self.pixels.fill(p);
    }

    /// Maps a texel coordinate through the sample mode.
    fn address(&self, x: i32, y: i32) -> (i32, i32) {
        let (w, h) = (self.width as i32, self.height as i32);
        match self.sample_mode {
            SampleMode::Normal => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            SampleMode::Periodic => (x.rem_euclid(w), y.rem_euclid(h)),
        }
    }

    /// Nearest-neighbour lookup at normalized `(u, v)`.
    ///
    /// `(0, 0)` is the top-left corner. Non-finite coordinates and empty
    /// sprites return [`Pixel::DEFAULT`].
    pub fn sample(&self, u: f32, v: f32) -> Pixel {
        if !u.is_finite() || !v.is_finite() || self.pixels.is_empty() {
            return Pixel::DEFAULT;
        }
        let sx = (u * self.width as f32).floor() as i32;
        let sy = (v * self.height as f32).floor() as i32;
        let (x, y) = self.address(sx, sy);
        self.get_pixel(x, y)
    }

    /// Bilinear lookup at normalized `(u, v)` over the four nearest texels.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Pixel {
        if !u.is_finite() || !v.is_finite() || self.pixels.is_empty() {
            return Pixel::DEFAULT;
        }
        let fx = u * self.width as f32 - 0.5;
        let fy = v * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let fetch = |x: i32, y: i32| {
            let (ax, ay) = self.address(x, y);
            self.get_pixel(ax, ay)
        };
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));
        let top = fetch(x0, y0).lerp(fetch(x1, y0), tx);
        let bottom = fetch(x0, y1).lerp(fetch(x1, y1), tx);
        top.lerp(bottom, ty)
    }

    pub fn data(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn data_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Raw RGBA8 bytes, row-major, suitable for texture uploads.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: Pixel is #[repr(C)] with four u8 fields, so it has size 4,
        // alignment 1 and no padding.
        unsafe {
            std::slice::from_raw_parts(self.pixels.as_ptr() as *const u8, self.pixels.len() * 4)
        }
    }
}
