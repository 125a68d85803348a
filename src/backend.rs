//! Contracts between the frame engine and the platform/graphics backends.
//!
//! The engine never talks to a window system or graphics API directly. It
//! drives one value implementing [`Backend`] (both [`Platform`] and
//! [`RenderBackend`]), so the SDL window, the headless recorder and any
//! other backend are interchangeable.

use crate::colors::Pixel;
use crate::decal::DecalInstance;
use crate::error::EngineResult;
use crate::math::{Vec2, Vi2d};
use crate::sprite::Sprite;

/// Opaque handle to a backend texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Something the platform observed since the last pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Raw key sample; `key` is a slot in the 256-entry key bank.
    Key { key: usize, down: bool },
    MouseButton { button: usize, down: bool },
    /// Mouse position in window pixels.
    MouseMove(Vi2d),
    MouseWheel(i32),
    Resize(Vi2d),
    KeyFocus(bool),
    MouseFocus(bool),
    Quit,
}

/// Window and event side of a backend.
pub trait Platform {
    /// Creates the window and graphics context. Called once at startup.
    fn create_graphics(
        &mut self,
        fullscreen: bool,
        vsync: bool,
        view_pos: Vi2d,
        view_size: Vi2d,
    ) -> EngineResult<()>;

    /// Appends every event observed since the previous call.
    fn pump_events(&mut self, events: &mut Vec<PlatformEvent>);

    fn set_window_title(&mut self, title: &str);

    fn show_cursor(&mut self, _visible: bool) {}
}

/// Texture and quad-drawing side of a backend.
pub trait RenderBackend {
    fn create_texture(&mut self, width: u32, height: u32) -> TextureId;

    fn delete_texture(&mut self, id: TextureId);

    /// Selects the texture used by the next [`draw_quad`](Self::draw_quad).
    fn apply_texture(&mut self, id: TextureId);

    fn upload_texture(&mut self, id: TextureId, sprite: &Sprite);

    /// Called once per frame before any layer is drawn.
    fn prepare_drawing(&mut self);

    /// Draws the applied texture over the whole viewport. `offset` and
    /// `scale` transform its texture coordinates.
    fn draw_quad(&mut self, offset: Vec2, scale: Vec2, tint: Pixel);

    fn draw_decal(&mut self, decal: &DecalInstance);

    fn clear(&mut self, color: Pixel, depth: bool);

    fn display_frame(&mut self);

    fn set_viewport(&mut self, pos: Vi2d, size: Vi2d);

    fn destroy_device(&mut self);
}

/// A complete backend: platform plus renderer.
pub trait Backend: Platform + RenderBackend {}

impl<T: Platform + RenderBackend> Backend for T {}
