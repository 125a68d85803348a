//! Engine construction parameters.

use crate::error::{EngineError, EngineResult};
use crate::math::Vi2d;

pub const DEFAULT_SCREEN_WIDTH: u32 = 256;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 240;
pub const DEFAULT_PIXEL_SIZE: u32 = 4;

/// Largest accepted `screen * pixel` extent on either axis.
const MAX_WINDOW_EXTENT: u64 = 16384;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub app_name: String,
    /// Logical screen size in pixels.
    pub screen_width: u32,
    pub screen_height: u32,
    /// Window pixels per logical pixel.
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Upper bound on frames per second; `None` runs as fast as the backend allows.
    pub frame_cap: Option<u32>,
}

/// Whether `screen * pixel` stays within [`MAX_WINDOW_EXTENT`] on both axes.
/// Non-positive sizes never fit.
pub(crate) fn window_fits(screen_size: Vi2d, pixel_size: Vi2d) -> bool {
    let extent = |screen: i32, pixel: i32| {
        screen > 0 && pixel > 0 && (screen as u64) * (pixel as u64) <= MAX_WINDOW_EXTENT
    };
    extent(screen_size.x, pixel_size.x) && extent(screen_size.y, pixel_size.y)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "pixelrig".to_string(),
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            pixel_width: DEFAULT_PIXEL_SIZE,
            pixel_height: DEFAULT_PIXEL_SIZE,
            fullscreen: false,
            vsync: false,
            frame_cap: None,
        }
    }
}

impl EngineConfig {
    pub fn new(screen_width: u32, screen_height: u32, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            pixel_width,
            pixel_height,
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_frame_cap(mut self, fps: Option<u32>) -> Self {
        self.frame_cap = fps;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(EngineError::invalid_config("screen size must be non-zero"));
        }
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(EngineError::invalid_config("pixel size must be non-zero"));
        }
        if !window_fits(self.screen_size(), self.pixel_size()) {
            let window_w = self.screen_width as u64 * self.pixel_width as u64;
            let window_h = self.screen_height as u64 * self.pixel_height as u64;
            return Err(EngineError::invalid_config(format!(
                "window of {window_w}x{window_h} exceeds {MAX_WINDOW_EXTENT}"
            )));
        }
        Ok(())
    }

    pub fn screen_size(&self) -> Vi2d {
        Vi2d::new(self.screen_width as i32, self.screen_height as i32)
    }

    pub fn pixel_size(&self) -> Vi2d {
        Vi2d::new(self.pixel_width as i32, self.pixel_height as i32)
    }

    /// Initial window size: every logical pixel at its configured size.
    pub fn window_size(&self) -> Vi2d {
        Vi2d::new(
            (self.screen_width * self.pixel_width) as i32,
            (self.screen_height * self.pixel_height) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(EngineConfig::new(0, 10, 1, 1).validate().is_err());
        assert!(EngineConfig::new(10, 10, 1, 0).validate().is_err());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let err = EngineConfig::new(10_000, 10, 4, 4).validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn window_fits_bounds_both_axes() {
        assert!(window_fits(Vi2d::new(4096, 4096), Vi2d::new(4, 4)));
        assert!(!window_fits(Vi2d::new(4097, 10), Vi2d::new(4, 4)));
        assert!(!window_fits(Vi2d::new(10, i32::MAX), Vi2d::new(1, 1)));
        assert!(!window_fits(Vi2d::new(0, 10), Vi2d::new(1, 1)));
    }

    #[test]
    fn window_size_multiplies_pixel_size() {
        let cfg = EngineConfig::new(160, 120, 4, 3).with_app_name("demo");
        assert_eq!(cfg.window_size(), Vi2d::new(640, 360));
        assert_eq!(cfg.app_name, "demo");
    }
}
