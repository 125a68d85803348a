//! The frame engine.
//!
//! [`Engine`] owns the layer stack, input state, timing and backend, and
//! runs the per-frame sequence:
//!
//! 1. measure elapsed time
//! 2. pump platform events into the raw input samples
//! 3. derive key and mouse edges, snapshot mouse position and wheel
//! 4. clear, then call [`Application::on_update`]
//! 5. set the viewport, clear, composite all layers, display
//!
//! The engine moves through [`EngineState::Uninitialized`],
//! [`EngineState::Running`] and [`EngineState::Terminated`] exactly once.

use tracing::{debug, error, info, trace};

use crate::backend::{Backend, PlatformEvent};
use crate::blend::{alpha_blend, PixelBlend, PixelMode};
use crate::colors::{Pixel, BLACK};
use crate::config::{window_fits, EngineConfig};
use crate::decal::{Decal, DecalInstance};
use crate::error::{EngineError, EngineResult};
use crate::font::{self, GLYPH_SIZE};
use crate::input::{HwButton, InputState, Key};
use crate::layer::{LayerStack, RenderHook};
use crate::math::{Vec2, Vi2d};
use crate::sprite::Sprite;
use crate::timing::FrameClock;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
    Terminated,
}

/// Application callbacks driven by [`Engine::start`].
pub trait Application {
    /// Called once after the engine is prepared. Returning `false` skips
    /// straight to shutdown.
    fn on_create<B: Backend>(&mut self, _engine: &mut Engine<B>) -> bool {
        true
    }

    /// Called once per frame. Returning `false` ends the run after the
    /// current frame is displayed.
    fn on_update<B: Backend>(&mut self, engine: &mut Engine<B>, elapsed: f32) -> bool;

    /// Called when the run ends. Returning `false` vetoes the shutdown and
    /// resumes the frame loop.
    fn on_destroy<B: Backend>(&mut self, _engine: &mut Engine<B>) -> bool {
        true
    }
}

/// Where pixel drawing goes.
enum DrawTarget {
    Layer(usize),
    Sprite(Sprite),
}

pub struct Engine<B: Backend> {
    backend: B,
    config: EngineConfig,
    state: EngineState,
    running: bool,

    screen_size: Vi2d,
    inv_screen_size: Vec2,
    pixel_size: Vi2d,
    window_size: Vi2d,
    viewport: Viewport,

    layers: LayerStack,
    draw_target: DrawTarget,
    target_layer: usize,
    pixel_mode: PixelMode,
    custom_blend: Option<Box<dyn PixelBlend>>,
    blend_factor: f32,

    input: InputState,
    events: Vec<PlatformEvent>,
    clock: FrameClock,
    font: Option<Decal>,
    mouse_visible: bool,
}

impl<B: Backend> Engine<B> {
    /// Validates `config` and builds an engine around `backend`. Nothing is
    /// created on the backend until [`prepare`](Self::prepare).
    pub fn construct(config: EngineConfig, backend: B) -> EngineResult<Self> {
        config.validate()?;

        let screen_size = config.screen_size();
        let pixel_size = config.pixel_size();
        let window_size = config.window_size();
        let viewport = Viewport::fit(screen_size, pixel_size, window_size);
        info!(
            app = %config.app_name,
            screen = ?screen_size,
            pixel = ?pixel_size,
            "constructed engine"
        );

        Ok(Self {
            backend,
            state: EngineState::Uninitialized,
            running: false,
            screen_size,
            inv_screen_size: screen_size.to_vec2().recip(),
            pixel_size,
            window_size,
            viewport,
            layers: LayerStack::new(),
            draw_target: DrawTarget::Layer(0),
            target_layer: 0,
            pixel_mode: PixelMode::Normal,
            custom_blend: None,
            blend_factor: 1.0,
            input: InputState::new(),
            events: Vec::new(),
            clock: FrameClock::new(config.frame_cap),
            font: None,
            mouse_visible: true,
            config,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates the graphics context, the font sheet and layer 0, and starts
    /// the clock. A graphics failure leaves the engine uninitialized.
    pub fn prepare(&mut self) -> EngineResult<()> {
        if self.state != EngineState::Uninitialized {
            return Err(EngineError::platform("engine can only be started once"));
        }

        if let Err(err) = self.backend.create_graphics(
            self.config.fullscreen,
            self.config.vsync,
            self.viewport.pos,
            self.viewport.size,
        ) {
            error!(%err, "failed to create graphics context");
            return Err(err);
        }

        self.font = Some(Decal::new(font::font_sheet(), &mut self.backend));

        self.layers.create_layer(self.screen_size, &mut self.backend);
        self.layers.enable(0, true);
        self.layers.mark_draw_target(0);
        self.set_draw_target(None);

        self.backend.set_window_title(&self.config.app_name);
        self.clock.restart();
        self.state = EngineState::Running;
        self.running = true;
        Ok(())
    }

    /// Runs `app` until it (or the platform) stops the loop, then tears down.
    pub fn start<A: Application>(&mut self, app: &mut A) -> EngineResult<()> {
        self.prepare()?;
        info!(app = %self.config.app_name, "starting frame loop");

        if !app.on_create(self) {
            self.running = false;
        }

        loop {
            while self.running {
                self.core_update(app);
            }
            if app.on_destroy(self) {
                break;
            }
            debug!("shutdown vetoed by application");
            self.running = true;
        }

        self.terminate();
        Ok(())
    }

    /// Executes one frame. Does nothing unless the engine is running.
    pub fn core_update<A: Application>(&mut self, app: &mut A) {
        if self.state != EngineState::Running {
            debug!(state = ?self.state, "core_update outside running state");
            return;
        }

        let elapsed = self.clock.tick();

        self.pump_events();
        self.input.tick();

        self.backend.clear(BLACK, true);

        if !app.on_update(self, elapsed) {
            self.running = false;
        }

        self.backend
            .set_viewport(self.viewport.pos, self.viewport.size);
        self.backend.clear(BLACK, true);

        self.layers.composite(&mut self.backend);
        self.backend.display_frame();

        self.report_fps(elapsed);
    }

    /// Counts the frame and retitles the window once per second.
    fn report_fps(&mut self, elapsed: f32) {
        if let Some(fps) = self.clock.record(elapsed) {
            let title = format!("{} - FPS: {}", self.config.app_name, fps);
            self.backend.set_window_title(&title);
        }
    }

    fn pump_events(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        self.backend.pump_events(&mut events);

        for event in events.drain(..) {
            match event {
                PlatformEvent::Key { key, down } => self.input.set_key(key, down),
                PlatformEvent::MouseButton { button, down } => {
                    self.input.set_mouse_button(button, down)
                }
                PlatformEvent::MouseMove(pos) => {
                    self.input.update_mouse(pos, &self.viewport, self.screen_size)
                }
                PlatformEvent::MouseWheel(delta) => self.input.update_mouse_wheel(delta),
                PlatformEvent::Resize(size) => self.update_window_size(size),
                PlatformEvent::KeyFocus(focus) => self.input.set_key_focus(focus),
                PlatformEvent::MouseFocus(focus) => self.input.set_mouse_focus(focus),
                PlatformEvent::Quit => self.running = false,
            }
        }

        self.events = events;
    }

    fn update_window_size(&mut self, size: Vi2d) {
        self.window_size = size;
        self.viewport = Viewport::fit(self.screen_size, self.pixel_size, size);
        debug!(window = ?size, viewport = ?self.viewport, "window resized");
    }

    /// Releases every layer, the font decal and the graphics device.
    pub fn terminate(&mut self) {
        if self.state == EngineState::Terminated {
            return;
        }
        if let Some(font) = self.font.take() {
            font.release(&mut self.backend);
        }
        self.layers.release(&mut self.backend);
        self.backend.destroy_device();
        self.running = false;
        self.state = EngineState::Terminated;
        info!(app = %self.config.app_name, "engine terminated");
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Asks the loop to stop after the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Hardware interfaces
    // =========================================================================

    pub fn is_focused(&self) -> bool {
        self.input.has_input_focus()
    }

    pub fn key(&self, key: Key) -> HwButton {
        self.input.key(key)
    }

    pub fn mouse(&self, button: usize) -> HwButton {
        self.input.mouse(button)
    }

    /// Mouse X in logical pixel space.
    pub fn mouse_x(&self) -> i32 {
        self.input.mouse_pos().x
    }

    /// Mouse Y in logical pixel space.
    pub fn mouse_y(&self) -> i32 {
        self.input.mouse_pos().y
    }

    pub fn mouse_pos(&self) -> Vi2d {
        self.input.mouse_pos()
    }

    pub fn mouse_wheel(&self) -> i32 {
        self.input.mouse_wheel()
    }

    /// Mouse position in window pixels.
    pub fn window_mouse(&self) -> Vi2d {
        self.input.window_mouse()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    // =========================================================================
    // Utility
    // =========================================================================

    pub fn screen_width(&self) -> i32 {
        self.screen_size.x
    }

    pub fn screen_height(&self) -> i32 {
        self.screen_size.y
    }

    pub fn screen_size(&self) -> Vi2d {
        self.screen_size
    }

    pub fn window_size(&self) -> Vi2d {
        self.window_size
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    pub fn elapsed_time(&self) -> f32 {
        self.clock.last_elapsed()
    }

    pub fn show_system_mouse_cursor(&mut self, visible: bool) {
        self.mouse_visible = visible;
        self.backend.show_cursor(visible);
    }

    pub fn is_mouse_cursor_visible(&self) -> bool {
        self.mouse_visible
    }

    /// Changes the logical screen size. Every layer's buffer and texture is
    /// recreated blank and the draw target returns to layer 0.
    ///
    /// Returns the off-screen sprite that was the draw target, if any. Sizes
    /// that are non-positive or whose window would exceed the configured
    /// limit are ignored.
    pub fn set_screen_size(&mut self, width: i32, height: i32) -> Option<Sprite> {
        let size = Vi2d::new(width, height);
        if !window_fits(size, self.pixel_size) {
            trace!(?size, "ignoring invalid screen size");
            return None;
        }
        self.screen_size = size;
        self.inv_screen_size = self.screen_size.to_vec2().recip();

        self.layers.resize(self.screen_size, &mut self.backend);
        let previous = self.set_draw_target(None);

        self.viewport = Viewport::fit(self.screen_size, self.pixel_size, self.window_size);
        self.backend.clear(BLACK, true);
        self.backend.display_frame();
        self.backend.clear(BLACK, true);
        self.backend
            .set_viewport(self.viewport.pos, self.viewport.size);
        previous
    }

    // =========================================================================
    // Draw targets
    // =========================================================================

    /// Draws into an off-screen sprite, or into layer 0 when `None`.
    ///
    /// Returns the previously installed off-screen sprite, if any.
    pub fn set_draw_target(&mut self, target: Option<Sprite>) -> Option<Sprite> {
        let next = match target {
            Some(sprite) => DrawTarget::Sprite(sprite),
            None => {
                self.target_layer = 0;
                DrawTarget::Layer(0)
            }
        };
        match std::mem::replace(&mut self.draw_target, next) {
            DrawTarget::Sprite(previous) => Some(previous),
            DrawTarget::Layer(_) => None,
        }
    }

    /// Draws into `layer` and marks it for upload. Out of range is a no-op.
    pub fn set_layer_draw_target(&mut self, layer: usize) -> Option<Sprite> {
        if !self.layers.mark_draw_target(layer) {
            return None;
        }
        self.target_layer = layer;
        match std::mem::replace(&mut self.draw_target, DrawTarget::Layer(layer)) {
            DrawTarget::Sprite(previous) => Some(previous),
            DrawTarget::Layer(_) => None,
        }
    }

    pub fn draw_target(&self) -> Option<&Sprite> {
        match &self.draw_target {
            DrawTarget::Layer(i) => self.layers.get(*i).map(|l| l.sprite()),
            DrawTarget::Sprite(sprite) => Some(sprite),
        }
    }

    pub fn draw_target_width(&self) -> i32 {
        self.draw_target().map_or(0, |s| s.width() as i32)
    }

    pub fn draw_target_height(&self) -> i32 {
        self.draw_target().map_or(0, |s| s.height() as i32)
    }

    fn target_sprite(&mut self) -> Option<&mut Sprite> {
        match &mut self.draw_target {
            DrawTarget::Layer(i) => self.layers.get_mut(*i).map(|l| l.sprite_mut()),
            DrawTarget::Sprite(sprite) => Some(sprite),
        }
    }

    // =========================================================================
    // Layers
    // =========================================================================

    pub fn create_layer(&mut self) -> usize {
        self.layers.create_layer(self.screen_size, &mut self.backend)
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn enable_layer(&mut self, layer: usize, visible: bool) {
        self.layers.enable(layer, visible);
    }

    pub fn set_layer_offset(&mut self, layer: usize, x: f32, y: f32) {
        self.layers.set_offset(layer, Vec2::new(x, y));
    }

    pub fn set_layer_scale(&mut self, layer: usize, x: f32, y: f32) {
        self.layers.set_scale(layer, Vec2::new(x, y));
    }

    pub fn set_layer_tint(&mut self, layer: usize, tint: Pixel) {
        self.layers.set_tint(layer, tint);
    }

    pub fn set_layer_custom_render_function(
        &mut self,
        layer: usize,
        hook: Option<Box<dyn RenderHook>>,
    ) {
        self.layers.set_hook(layer, hook);
    }

    // =========================================================================
    // Pixel modes
    // =========================================================================

    pub fn set_pixel_mode(&mut self, mode: PixelMode) {
        self.pixel_mode = mode;
    }

    pub fn pixel_mode(&self) -> PixelMode {
        self.pixel_mode
    }

    pub fn set_custom_pixel_mode(&mut self, blend: Box<dyn PixelBlend>) {
        self.custom_blend = Some(blend);
        self.pixel_mode = PixelMode::Custom;
    }

    /// Sets the alpha-mode blend factor, clamped to `[0, 1]`.
    pub fn set_pixel_blend(&mut self, blend: f32) {
        self.blend_factor = blend.clamp(0.0, 1.0);
    }

    pub fn pixel_blend(&self) -> f32 {
        self.blend_factor
    }

    // =========================================================================
    // Drawing routines
    // =========================================================================

    /// Plots one pixel on the draw target through the current pixel mode.
    pub fn draw(&mut self, x: i32, y: i32, p: Pixel) -> bool {
        let mode = self.pixel_mode;
        let blend_factor = self.blend_factor;
        let mut custom = self.custom_blend.take();

        let written = match self.target_sprite() {
            None => false,
            Some(target) => match mode {
                PixelMode::Normal => target.set_pixel(x, y, p),
                PixelMode::Mask => p.a == 255 && target.set_pixel(x, y, p),
                PixelMode::Alpha => {
                    let d = target.get_pixel(x, y);
                    target.set_pixel(x, y, alpha_blend(p, d, blend_factor))
                }
                PixelMode::Custom => match custom.as_mut() {
                    Some(blend) => {
                        let d = target.get_pixel(x, y);
                        target.set_pixel(x, y, blend.blend(x, y, p, d))
                    }
                    None => target.set_pixel(x, y, p),
                },
            },
        };

        self.custom_blend = custom;
        written
    }

    /// Fills the whole draw target.
    pub fn clear(&mut self, p: Pixel) {
        if let Some(target) = self.target_sprite() {
            target.clear(p);
        }
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)` inclusive, clipped to
    /// the draw target.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, p: Pixel) {
        let bounds = (self.draw_target_width(), self.draw_target_height());
        let Some((x0, y0, x1, y1)) = clip_line(x0, y0, x1, y1, bounds) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let x_step = if x0 < x1 { 1 } else { -1 };
        let y_step = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.draw(x as i32, y as i32, p);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_step;
            }
            if e2 < dx {
                err += dx;
                y += y_step;
            }
        }
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, p: Pixel) {
        let (x1, y1) = (x.saturating_add(w), y.saturating_add(h));
        self.draw_line(x, y, x1, y, p);
        self.draw_line(x1, y, x1, y1, p);
        self.draw_line(x1, y1, x, y1, p);
        self.draw_line(x, y1, x, y, p);
    }

    /// Fills `w x h` pixels from `(x, y)`, clipped to the draw target.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, p: Pixel) {
        let (tw, th) = (self.draw_target_width(), self.draw_target_height());
        let x0 = x.clamp(0, tw);
        let y0 = y.clamp(0, th);
        let x1 = x.saturating_add(w).clamp(0, tw);
        let y1 = y.saturating_add(h).clamp(0, th);

        for py in y0..y1 {
            for px in x0..x1 {
                self.draw(px, py, p);
            }
        }
    }

    /// Copies `sprite` onto the draw target at `(x, y)`, each source pixel
    /// drawn as a `scale x scale` block.
    pub fn draw_sprite(&mut self, x: i32, y: i32, sprite: &Sprite, scale: u32) {
        let scale = scale.max(1) as i32;
        for sy in 0..sprite.height() as i32 {
            for sx in 0..sprite.width() as i32 {
                let p = sprite.get_pixel(sx, sy);
                for i in 0..scale {
                    for j in 0..scale {
                        self.draw(x + sx * scale + i, y + sy * scale + j, p);
                    }
                }
            }
        }
    }

    /// Draws text with the built-in 8x8 font. `'\n'` starts a new line.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Pixel, scale: u32) {
        let Some(font) = self.font.as_ref() else {
            return;
        };
        let sheet = font.sprite();
        let scale = scale.max(1) as i32;

        let mut lit = Vec::new();
        let (mut sx, mut sy) = (0, 0);
        for c in text.chars() {
            if c == '\n' {
                sx = 0;
                sy += GLYPH_SIZE * scale;
                continue;
            }
            let (ox, oy) = font::glyph_origin(c);
            for i in 0..GLYPH_SIZE {
                for j in 0..GLYPH_SIZE {
                    if sheet.get_pixel(ox + i, oy + j).r > 0 {
                        for is in 0..scale {
                            for js in 0..scale {
                                lit.push((x + sx + i * scale + is, y + sy + j * scale + js));
                            }
                        }
                    }
                }
            }
            sx += GLYPH_SIZE * scale;
        }

        for (px, py) in lit {
            self.draw(px, py, color);
        }
    }

    // =========================================================================
    // Decals
    // =========================================================================

    /// Screen pixel position to normalized device coordinates.
    fn to_ndc(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x * self.inv_screen_size.x * 2.0 - 1.0,
            -(pos.y * self.inv_screen_size.y * 2.0 - 1.0),
        )
    }

    pub fn create_decal(&mut self, sprite: Sprite) -> Decal {
        Decal::new(sprite, &mut self.backend)
    }

    /// Re-uploads a decal whose sprite was edited.
    pub fn update_decal(&mut self, decal: &Decal) {
        decal.update(&mut self.backend);
    }

    pub fn release_decal(&mut self, decal: Decal) -> Sprite {
        decal.release(&mut self.backend)
    }

    /// Queues a decal instance on the current target layer.
    pub fn queue_decal(&mut self, instance: DecalInstance) {
        self.layers.queue_decal(self.target_layer, instance);
    }

    /// Queues the whole decal at `pos` (screen pixels), scaled and tinted.
    pub fn draw_decal(&mut self, pos: Vec2, decal: &Decal, scale: Vec2, tint: Pixel) {
        let size = Vec2::new(decal.sprite().width() as f32, decal.sprite().height() as f32);
        self.draw_partial_decal(pos, decal, Vec2::ZERO, size, scale, tint);
    }

    /// Queues the `source_size` region at `source_pos` of a decal.
    pub fn draw_partial_decal(
        &mut self,
        pos: Vec2,
        decal: &Decal,
        source_pos: Vec2,
        source_size: Vec2,
        scale: Vec2,
        tint: Pixel,
    ) {
        let tl = self.to_ndc(pos);
        let br = Vec2::new(
            tl.x + 2.0 * source_size.x * self.inv_screen_size.x * scale.x,
            tl.y - 2.0 * source_size.y * self.inv_screen_size.y * scale.y,
        );

        let uv_tl = source_pos.scale(decal.uv_scale());
        let uv_br = uv_tl + source_size.scale(decal.uv_scale());

        let mut instance = DecalInstance::new(decal.id());
        instance.pos = [
            Vec2::new(tl.x, tl.y),
            Vec2::new(tl.x, br.y),
            Vec2::new(br.x, br.y),
            Vec2::new(br.x, tl.y),
        ];
        instance.uv = [
            Vec2::new(uv_tl.x, uv_tl.y),
            Vec2::new(uv_tl.x, uv_br.y),
            Vec2::new(uv_br.x, uv_br.y),
            Vec2::new(uv_br.x, uv_tl.y),
        ];
        instance.tint = [tint; 4];
        self.queue_decal(instance);
    }

    /// Queues a decal stretched over an arbitrary quad. Corners are given in
    /// screen pixels, top-left then counter-clockwise. Degenerate quads
    /// (parallel diagonals) are dropped.
    pub fn draw_warped_decal(&mut self, decal: &Decal, pos: [Vec2; 4], tint: Pixel) {
        let rd = (pos[2].x - pos[0].x) * (pos[3].y - pos[1].y)
            - (pos[3].x - pos[1].x) * (pos[2].y - pos[0].y);
        if rd == 0.0 {
            return;
        }
        let rd = 1.0 / rd;
        let rn = ((pos[3].x - pos[1].x) * (pos[0].y - pos[1].y)
            - (pos[3].y - pos[1].y) * (pos[0].x - pos[1].x))
            * rd;
        let sn = ((pos[2].x - pos[0].x) * (pos[0].y - pos[1].y)
            - (pos[2].y - pos[0].y) * (pos[0].x - pos[1].x))
            * rd;

        // Diagonal intersection; depth weights come from each corner's
        // distance to it.
        let mut center = Vec2::ZERO;
        if (0.0..=1.0).contains(&rn) && (0.0..=1.0).contains(&sn) {
            center = pos[0] + (pos[2] - pos[0]) * rn;
        }
        let d: [f32; 4] = std::array::from_fn(|i| (pos[i] - center).magnitude());

        let mut instance = DecalInstance::new(decal.id());
        for i in 0..4 {
            let opposite = d[(i + 2) & 3];
            let q = if d[i] == 0.0 || opposite == 0.0 {
                1.0
            } else {
                (d[i] + opposite) / opposite
            };
            instance.uv[i] = instance.uv[i] * q;
            instance.w[i] *= q;
            instance.pos[i] = self.to_ndc(pos[i]);
        }
        instance.tint = [tint; 4];
        self.queue_decal(instance);
    }

    /// Queues text as decals from the built-in font sheet.
    pub fn draw_string_decal(&mut self, pos: Vec2, text: &str, color: Pixel, scale: Vec2) {
        let Some(font) = self.font.take() else {
            return;
        };
        let glyph = GLYPH_SIZE as f32;
        let mut spos = Vec2::ZERO;
        for c in text.chars() {
            if c == '\n' {
                spos.x = 0.0;
                spos.y += glyph * scale.y;
                continue;
            }
            let (ox, oy) = font::glyph_origin(c);
            self.draw_partial_decal(
                pos + spos,
                &font,
                Vec2::new(ox as f32, oy as f32),
                Vec2::new(glyph, glyph),
                scale,
                color,
            );
            spos.x += glyph * scale.x;
        }
        self.font = Some(font);
    }
}

/// Liang-Barsky clip of a segment to `[0, w) x [0, h)`. Returns the
/// surviving endpoints, or `None` when the segment misses the target.
fn clip_line(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    (w, h): (i32, i32),
) -> Option<(i64, i64, i64, i64)> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let (fx0, fy0) = (x0 as f64, y0 as f64);
    let (dx, dy) = (x1 as f64 - fx0, y1 as f64 - fy0);
    let (x_max, y_max) = ((w - 1) as f64, (h - 1) as f64);

    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, fx0), (dx, x_max - fx0), (-dy, fy0), (dy, y_max - fy0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let snap = |v: f64, max: f64| v.round().clamp(0.0, max) as i64;
    Some((
        snap(fx0 + t0 * dx, x_max),
        snap(fy0 + t0 * dy, y_max),
        snap(fx0 + t1 * dx, x_max),
        snap(fy0 + t1 * dy, y_max),
    ))
}
