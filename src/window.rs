//! SDL2 window and renderer backend.

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton as SdlMouseButton;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::WindowContext;
use tracing::{debug, warn};

use crate::backend::{Platform, PlatformEvent, RenderBackend, TextureId};
use crate::colors::Pixel;
use crate::decal::DecalInstance;
use crate::error::{EngineError, EngineResult};
use crate::input::{Key, MouseButton};
use crate::math::{Vec2, Vi2d};
use crate::sprite::Sprite;

/// Everything that exists only between `create_graphics` and `destroy_device`.
struct Graphics {
    // Declared before `texture_creator` so textures drop first.
    textures: Vec<Option<Texture<'static>>>,
    canvas: Canvas<sdl2::video::Window>,
    texture_creator: Box<TextureCreator<WindowContext>>,
    applied: Option<TextureId>,
    viewport: Rect,
}

impl Graphics {
    fn texture(&mut self, id: TextureId) -> Option<&mut Texture<'static>> {
        self.textures.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}

/// A desktop window rendered with the SDL2 accelerated renderer.
pub struct SdlWindow {
    graphics: Option<Graphics>,
    sdl: sdl2::Sdl,
    video: sdl2::VideoSubsystem,
    event_pump: sdl2::EventPump,
    title: String,
    size: Vi2d,
}

impl SdlWindow {
    /// Initializes SDL. The window itself is created by
    /// [`Platform::create_graphics`].
    pub fn new(title: &str, size: Vi2d) -> EngineResult<Self> {
        let sdl = sdl2::init().map_err(EngineError::platform)?;
        let video = sdl.video().map_err(EngineError::platform)?;
        let event_pump = sdl.event_pump().map_err(EngineError::platform)?;

        Ok(Self {
            graphics: None,
            sdl,
            video,
            event_pump,
            title: title.to_string(),
            size,
        })
    }

    fn graphics(&mut self) -> Option<&mut Graphics> {
        if self.graphics.is_none() {
            warn!("render call before graphics were created");
        }
        self.graphics.as_mut()
    }
}

impl Platform for SdlWindow {
    fn create_graphics(
        &mut self,
        fullscreen: bool,
        vsync: bool,
        view_pos: Vi2d,
        view_size: Vi2d,
    ) -> EngineResult<()> {
        let mut builder = self.video.window(
            &self.title,
            self.size.x.max(1) as u32,
            self.size.y.max(1) as u32,
        );
        builder.position_centered().resizable();
        if fullscreen {
            builder.fullscreen_desktop();
        }
        let window = builder
            .build()
            .map_err(|e| EngineError::graphics(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let mut canvas = canvas_builder
            .build()
            .map_err(|e| EngineError::graphics(e.to_string()))?;
        canvas.set_blend_mode(BlendMode::Blend);

        let viewport = Rect::new(
            view_pos.x,
            view_pos.y,
            view_size.x.max(1) as u32,
            view_size.y.max(1) as u32,
        );
        canvas.set_viewport(viewport);

        let texture_creator = Box::new(canvas.texture_creator());
        debug!(fullscreen, vsync, ?view_size, "created SDL renderer");

        self.graphics = Some(Graphics {
            textures: Vec::new(),
            canvas,
            texture_creator,
            applied: None,
            viewport,
        });
        Ok(())
    }

    fn pump_events(&mut self, events: &mut Vec<PlatformEvent>) {
        for event in self.event_pump.poll_iter() {
            let mapped = match event {
                Event::Quit { .. } => Some(PlatformEvent::Quit),
                Event::KeyDown {
                    keycode: Some(code),
                    ..
                } => map_keycode(code).map(|key| PlatformEvent::Key {
                    key: key.index(),
                    down: true,
                }),
                Event::KeyUp {
                    keycode: Some(code),
                    ..
                } => map_keycode(code).map(|key| PlatformEvent::Key {
                    key: key.index(),
                    down: false,
                }),
                Event::MouseButtonDown { mouse_btn, .. } => {
                    map_mouse_button(mouse_btn).map(|b| PlatformEvent::MouseButton {
                        button: b.index(),
                        down: true,
                    })
                }
                Event::MouseButtonUp { mouse_btn, .. } => {
                    map_mouse_button(mouse_btn).map(|b| PlatformEvent::MouseButton {
                        button: b.index(),
                        down: false,
                    })
                }
                Event::MouseMotion { x, y, .. } => Some(PlatformEvent::MouseMove(Vi2d::new(x, y))),
                Event::MouseWheel { y, .. } => Some(PlatformEvent::MouseWheel(y)),
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::Resized(w, h) | WindowEvent::SizeChanged(w, h) => {
                        self.size = Vi2d::new(w, h);
                        Some(PlatformEvent::Resize(self.size))
                    }
                    WindowEvent::FocusGained => Some(PlatformEvent::KeyFocus(true)),
                    WindowEvent::FocusLost => Some(PlatformEvent::KeyFocus(false)),
                    WindowEvent::Enter => Some(PlatformEvent::MouseFocus(true)),
                    WindowEvent::Leave => Some(PlatformEvent::MouseFocus(false)),
                    _ => None,
                },
                _ => None,
            };
            events.extend(mapped);
        }
    }

    fn set_window_title(&mut self, title: &str) {
        if let Some(gfx) = self.graphics.as_mut() {
            if let Err(e) = gfx.canvas.window_mut().set_title(title) {
                warn!(%e, "failed to set window title");
            }
        }
    }

    fn show_cursor(&mut self, visible: bool) {
        self.sdl.mouse().show_cursor(visible);
    }
}

impl RenderBackend for SdlWindow {
    fn create_texture(&mut self, width: u32, height: u32) -> TextureId {
        let Some(gfx) = self.graphics() else {
            return TextureId(u32::MAX);
        };

        // SAFETY: texture_creator is boxed and lives as long as `Graphics`.
        // Every texture is dropped before it, by field order or explicitly.
        let creator: &'static TextureCreator<WindowContext> =
            unsafe { &*(gfx.texture_creator.as_ref() as *const _) };

        // ABGR8888 stores bytes as R, G, B, A on little-endian, matching `Pixel`.
        let texture = match creator.create_texture_streaming(
            PixelFormatEnum::ABGR8888,
            width.max(1),
            height.max(1),
        ) {
            Ok(mut texture) => {
                texture.set_blend_mode(BlendMode::Blend);
                Some(texture)
            }
            Err(e) => {
                warn!(%e, width, height, "failed to create texture");
                None
            }
        };

        let slot = gfx.textures.iter().position(Option::is_none);
        let index = match slot {
            Some(i) => {
                gfx.textures[i] = texture;
                i
            }
            None => {
                gfx.textures.push(texture);
                gfx.textures.len() - 1
            }
        };
        TextureId(index as u32)
    }

    fn delete_texture(&mut self, id: TextureId) {
        if let Some(gfx) = self.graphics() {
            if let Some(slot) = gfx.textures.get_mut(id.0 as usize) {
                *slot = None;
            }
            if gfx.applied == Some(id) {
                gfx.applied = None;
            }
        }
    }

    fn apply_texture(&mut self, id: TextureId) {
        if let Some(gfx) = self.graphics() {
            gfx.applied = Some(id);
        }
    }

    fn upload_texture(&mut self, id: TextureId, sprite: &Sprite) {
        let Some(texture) = self.graphics().and_then(|gfx| gfx.texture(id)) else {
            return;
        };
        let pitch = sprite.width() as usize * 4;
        if let Err(e) = texture.update(None, sprite.as_bytes(), pitch) {
            warn!(%e, ?id, "failed to upload texture");
        }
    }

    fn prepare_drawing(&mut self) {
        if let Some(gfx) = self.graphics() {
            gfx.canvas.set_blend_mode(BlendMode::Blend);
        }
    }

    fn draw_quad(&mut self, offset: Vec2, scale: Vec2, tint: Pixel) {
        let Some(gfx) = self.graphics() else {
            return;
        };
        let Some(id) = gfx.applied else {
            return;
        };
        let Graphics {
            textures, canvas, ..
        } = gfx;
        let Some(texture) = textures.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return;
        };

        let query = texture.query();
        let (tw, th) = (query.width as f32, query.height as f32);
        let src = Rect::new(
            (offset.x * tw) as i32,
            (offset.y * th) as i32,
            (scale.x * tw).max(1.0) as u32,
            (scale.y * th).max(1.0) as u32,
        );

        texture.set_color_mod(tint.r, tint.g, tint.b);
        texture.set_alpha_mod(tint.a);
        if let Err(e) = canvas.copy(texture, src, None) {
            warn!(%e, "failed to draw layer quad");
        }
    }

    fn draw_decal(&mut self, decal: &DecalInstance) {
        let Some(gfx) = self.graphics() else {
            return;
        };
        let (vw, vh) = (gfx.viewport.width() as f32, gfx.viewport.height() as f32);
        let Graphics {
            textures, canvas, ..
        } = gfx;
        let Some(texture) = textures
            .get_mut(decal.decal.0 as usize)
            .and_then(Option::as_mut)
        else {
            return;
        };

        // The renderer only copies axis-aligned rectangles, so the quad is
        // reduced to its bounds in both spaces.
        let bounds = |points: [Vec2; 4]| {
            points.iter().fold(
                (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
                |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
            )
        };
        let screen = decal
            .pos
            .map(|p| Vec2::new((p.x + 1.0) * 0.5 * vw, (1.0 - p.y) * 0.5 * vh));
        let uv: [Vec2; 4] = std::array::from_fn(|i| decal.uv[i] / decal.w[i]);

        let query = texture.query();
        let (tw, th) = (query.width as f32, query.height as f32);
        let (sx0, sy0, sx1, sy1) = bounds(uv);
        let (dx0, dy0, dx1, dy1) = bounds(screen);

        let src = Rect::new(
            (sx0 * tw).round() as i32,
            (sy0 * th).round() as i32,
            ((sx1 - sx0) * tw).round().max(1.0) as u32,
            ((sy1 - sy0) * th).round().max(1.0) as u32,
        );
        let dst = Rect::new(
            dx0.round() as i32,
            dy0.round() as i32,
            (dx1 - dx0).round().max(1.0) as u32,
            (dy1 - dy0).round().max(1.0) as u32,
        );

        let tint = decal.tint[0];
        texture.set_color_mod(tint.r, tint.g, tint.b);
        texture.set_alpha_mod(tint.a);
        if let Err(e) = canvas.copy(texture, src, dst) {
            warn!(%e, "failed to draw decal");
        }
    }

    fn clear(&mut self, color: Pixel, _depth: bool) {
        if let Some(gfx) = self.graphics() {
            gfx.canvas
                .set_draw_color(Color::RGBA(color.r, color.g, color.b, color.a));
            gfx.canvas.clear();
        }
    }

    fn display_frame(&mut self) {
        if let Some(gfx) = self.graphics() {
            gfx.canvas.present();
        }
    }

    fn set_viewport(&mut self, pos: Vi2d, size: Vi2d) {
        if let Some(gfx) = self.graphics() {
            gfx.viewport = Rect::new(pos.x, pos.y, size.x.max(1) as u32, size.y.max(1) as u32);
            gfx.canvas.set_viewport(gfx.viewport);
        }
    }

    fn destroy_device(&mut self) {
        if let Some(mut gfx) = self.graphics.take() {
            gfx.textures.clear();
            debug!("destroyed SDL renderer");
        }
    }
}

fn map_mouse_button(button: SdlMouseButton) -> Option<MouseButton> {
    match button {
        SdlMouseButton::Left => Some(MouseButton::Left),
        SdlMouseButton::Right => Some(MouseButton::Right),
        SdlMouseButton::Middle => Some(MouseButton::Middle),
        SdlMouseButton::X1 => Some(MouseButton::X1),
        SdlMouseButton::X2 => Some(MouseButton::X2),
        _ => None,
    }
}

fn map_keycode(code: Keycode) -> Option<Key> {
    let key = match code {
        Keycode::A => Key::A,
        Keycode::B => Key::B,
        Keycode::C => Key::C,
        Keycode::D => Key::D,
        Keycode::E => Key::E,
        Keycode::F => Key::F,
        Keycode::G => Key::G,
        Keycode::H => Key::H,
        Keycode::I => Key::I,
        Keycode::J => Key::J,
        Keycode::K => Key::K,
        Keycode::L => Key::L,
        Keycode::M => Key::M,
        Keycode::N => Key::N,
        Keycode::O => Key::O,
        Keycode::P => Key::P,
        Keycode::Q => Key::Q,
        Keycode::R => Key::R,
        Keycode::S => Key::S,
        Keycode::T => Key::T,
        Keycode::U => Key::U,
        Keycode::V => Key::V,
        Keycode::W => Key::W,
        Keycode::X => Key::X,
        Keycode::Y => Key::Y,
        Keycode::Z => Key::Z,
        Keycode::Num0 => Key::K0,
        Keycode::Num1 => Key::K1,
        Keycode::Num2 => Key::K2,
        Keycode::Num3 => Key::K3,
        Keycode::Num4 => Key::K4,
        Keycode::Num5 => Key::K5,
        Keycode::Num6 => Key::K6,
        Keycode::Num7 => Key::K7,
        Keycode::Num8 => Key::K8,
        Keycode::Num9 => Key::K9,
        Keycode::F1 => Key::F1,
        Keycode::F2 => Key::F2,
        Keycode::F3 => Key::F3,
        Keycode::F4 => Key::F4,
        Keycode::F5 => Key::F5,
        Keycode::F6 => Key::F6,
        Keycode::F7 => Key::F7,
        Keycode::F8 => Key::F8,
        Keycode::F9 => Key::F9,
        Keycode::F10 => Key::F10,
        Keycode::F11 => Key::F11,
        Keycode::F12 => Key::F12,
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Space => Key::Space,
        Keycode::Tab => Key::Tab,
        Keycode::LShift | Keycode::RShift => Key::Shift,
        Keycode::LCtrl | Keycode::RCtrl => Key::Ctrl,
        Keycode::Insert => Key::Ins,
        Keycode::Delete => Key::Del,
        Keycode::Home => Key::Home,
        Keycode::End => Key::End,
        Keycode::PageUp => Key::PgUp,
        Keycode::PageDown => Key::PgDn,
        Keycode::Backspace => Key::Back,
        Keycode::Escape => Key::Escape,
        Keycode::Return => Key::Return,
        Keycode::KpEnter => Key::Enter,
        Keycode::Pause => Key::Pause,
        Keycode::ScrollLock => Key::Scroll,
        Keycode::Kp0 => Key::Np0,
        Keycode::Kp1 => Key::Np1,
        Keycode::Kp2 => Key::Np2,
        Keycode::Kp3 => Key::Np3,
        Keycode::Kp4 => Key::Np4,
        Keycode::Kp5 => Key::Np5,
        Keycode::Kp6 => Key::Np6,
        Keycode::Kp7 => Key::Np7,
        Keycode::Kp8 => Key::Np8,
        Keycode::Kp9 => Key::Np9,
        Keycode::KpMultiply => Key::NpMul,
        Keycode::KpDivide => Key::NpDiv,
        Keycode::KpPlus => Key::NpAdd,
        Keycode::KpMinus => Key::NpSub,
        Keycode::KpPeriod => Key::NpDecimal,
        Keycode::Period => Key::Period,
        _ => return None,
    };
    Some(key)
}
