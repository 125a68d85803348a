use std::cell::Cell;
use std::rc::Rc;

use pixelrig::headless::{BackendCall, HeadlessBackend};
use pixelrig::prelude::*;

fn prepared(config: EngineConfig) -> Engine<HeadlessBackend> {
    let mut engine = Engine::construct(config, HeadlessBackend::new()).unwrap();
    engine.prepare().unwrap();
    engine
}

fn layer_texture(engine: &Engine<HeadlessBackend>, index: usize) -> pixelrig::TextureId {
    engine.layers().get(index).unwrap().texture()
}

struct Idle;

impl Application for Idle {
    fn on_update<B: Backend>(&mut self, _engine: &mut Engine<B>, _elapsed: f32) -> bool {
        true
    }
}

struct Painter;

impl Application for Painter {
    fn on_update<B: Backend>(&mut self, engine: &mut Engine<B>, _elapsed: f32) -> bool {
        engine.draw(0, 0, RED);
        true
    }
}

#[derive(Default)]
struct Recorder {
    keys: Vec<HwButton>,
    mouse: Vec<Vi2d>,
    wheel: Vec<i32>,
}

impl Application for Recorder {
    fn on_update<B: Backend>(&mut self, engine: &mut Engine<B>, _elapsed: f32) -> bool {
        self.keys.push(engine.key(Key::A));
        self.mouse.push(engine.mouse_pos());
        self.wheel.push(engine.mouse_wheel());
        true
    }
}

struct StopAfter {
    frames: u32,
    seen: u32,
    created: bool,
    destroyed: u32,
    vetoes: u32,
}

impl StopAfter {
    fn new(frames: u32) -> Self {
        Self {
            frames,
            seen: 0,
            created: false,
            destroyed: 0,
            vetoes: 0,
        }
    }
}

impl Application for StopAfter {
    fn on_create<B: Backend>(&mut self, _engine: &mut Engine<B>) -> bool {
        self.created = true;
        true
    }

    fn on_update<B: Backend>(&mut self, _engine: &mut Engine<B>, _elapsed: f32) -> bool {
        self.seen += 1;
        self.seen < self.frames
    }

    fn on_destroy<B: Backend>(&mut self, _engine: &mut Engine<B>) -> bool {
        self.destroyed += 1;
        if self.vetoes > 0 {
            self.vetoes -= 1;
            self.seen = 0;
            return false;
        }
        true
    }
}

#[test]
fn drawn_pixel_is_uploaded_before_display() {
    let mut engine = prepared(EngineConfig::new(160, 120, 4, 4));
    engine.backend_mut().clear_calls();

    engine.core_update(&mut Painter);

    let texture = layer_texture(&engine, 0);
    assert_eq!(engine.layers().get(0).unwrap().sprite().get_pixel(0, 0), RED);
    assert_eq!(engine.backend().texture(texture).unwrap().get_pixel(0, 0), RED);

    let calls = engine.backend().calls();
    let position = |wanted: &BackendCall| calls.iter().position(|c| c == wanted).unwrap();
    let prepare = position(&BackendCall::PrepareDrawing);
    let upload = position(&BackendCall::UploadTexture(texture));
    let display = position(&BackendCall::DisplayFrame);
    assert!(prepare < upload);
    assert!(upload < display);
}

#[test]
fn key_edges_follow_raw_samples() {
    let mut engine = prepared(EngineConfig::default());
    let a = Key::A.index();
    let backend = engine.backend_mut();
    backend.push_frame_events([PlatformEvent::Key { key: a, down: true }]);
    backend.push_frame_events([]);
    backend.push_frame_events([]);
    backend.push_frame_events([PlatformEvent::Key { key: a, down: false }]);

    let mut app = Recorder::default();
    for _ in 0..4 {
        engine.core_update(&mut app);
    }

    let pressed: Vec<bool> = app.keys.iter().map(|k| k.pressed).collect();
    let held: Vec<bool> = app.keys.iter().map(|k| k.held).collect();
    let released: Vec<bool> = app.keys.iter().map(|k| k.released).collect();
    assert_eq!(pressed, [true, false, false, false]);
    assert_eq!(held, [true, true, true, false]);
    assert_eq!(released, [false, false, false, true]);
}

#[test]
fn losing_key_focus_releases_held_keys() {
    let mut engine = prepared(EngineConfig::default());
    let a = Key::A.index();
    let backend = engine.backend_mut();
    backend.push_frame_events([PlatformEvent::Key { key: a, down: true }]);
    backend.push_frame_events([PlatformEvent::KeyFocus(false)]);

    let mut app = Recorder::default();
    engine.core_update(&mut app);
    engine.core_update(&mut app);

    assert!(app.keys[0].held);
    assert!(app.keys[1].released);
    assert!(!engine.is_focused());
}

#[test]
fn mouse_position_and_wheel_are_snapshotted_per_frame() {
    // 256x240 at 4x4 fills a 1024x960 window exactly.
    let mut engine = prepared(EngineConfig::default());
    engine.backend_mut().push_frame_events([
        PlatformEvent::MouseMove(Vi2d::new(40, 80)),
        PlatformEvent::MouseWheel(1),
        PlatformEvent::MouseWheel(2),
    ]);

    let mut app = Recorder::default();
    engine.core_update(&mut app);
    engine.core_update(&mut app);

    assert_eq!(app.mouse, [Vi2d::new(10, 20), Vi2d::new(10, 20)]);
    assert_eq!(app.wheel, [3, 0]);
    assert_eq!(engine.window_mouse(), Vi2d::new(40, 80));
}

#[test]
fn mouse_outside_viewport_is_clamped() {
    let mut engine = prepared(EngineConfig::new(100, 50, 2, 2));
    engine
        .backend_mut()
        .push_frame_events([PlatformEvent::MouseMove(Vi2d::new(5000, -30))]);
    engine.core_update(&mut Idle);
    assert_eq!(engine.mouse_pos(), Vi2d::new(99, 0));
}

#[test]
fn resize_event_refits_viewport() {
    let mut engine = prepared(EngineConfig::new(160, 120, 4, 4));
    engine
        .backend_mut()
        .push_frame_events([PlatformEvent::Resize(Vi2d::new(1000, 480))]);
    engine.backend_mut().clear_calls();
    engine.core_update(&mut Idle);

    assert_eq!(engine.viewport().pos, Vi2d::new(180, 0));
    assert_eq!(engine.viewport().size, Vi2d::new(640, 480));
    assert!(engine.backend().calls().contains(&BackendCall::SetViewport {
        pos: Vi2d::new(180, 0),
        size: Vi2d::new(640, 480),
    }));
}

#[test]
fn layers_composite_base_first_then_top_down() {
    let mut engine = prepared(EngineConfig::new(64, 64, 1, 1));
    let first = engine.create_layer();
    let second = engine.create_layer();
    engine.enable_layer(first, true);
    engine.enable_layer(second, true);
    engine.backend_mut().clear_calls();

    engine.core_update(&mut Idle);

    assert_eq!(
        engine.backend().quad_textures(),
        [
            layer_texture(&engine, 0),
            layer_texture(&engine, second),
            layer_texture(&engine, first),
        ]
    );
}

#[test]
fn layer_settings_reach_the_backend() {
    let mut engine = prepared(EngineConfig::new(64, 64, 1, 1));
    let layer = engine.create_layer();
    engine.enable_layer(layer, true);
    engine.set_layer_offset(layer, 0.25, 0.5);
    engine.set_layer_scale(layer, 2.0, 3.0);
    engine.set_layer_tint(layer, BLUE);
    engine.backend_mut().clear_calls();

    engine.core_update(&mut Idle);

    let texture = layer_texture(&engine, layer);
    assert!(engine.backend().calls().contains(&BackendCall::DrawQuad {
        texture: Some(texture),
        offset: Vec2::new(0.25, 0.5),
        scale: Vec2::new(2.0, 3.0),
        tint: BLUE,
    }));
}

#[test]
fn custom_render_function_replaces_layer_drawing() {
    let mut engine = prepared(EngineConfig::new(64, 64, 1, 1));
    let layer = engine.create_layer();
    engine.enable_layer(layer, true);

    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    engine.set_layer_custom_render_function(
        layer,
        Some(Box::new(move |_backend: &mut dyn RenderBackend| {
            counter.set(counter.get() + 1);
        })),
    );
    engine.backend_mut().clear_calls();

    engine.core_update(&mut Idle);
    engine.core_update(&mut Idle);

    assert_eq!(runs.get(), 2);
    let texture = layer_texture(&engine, layer);
    assert!(!engine.backend().quad_textures().contains(&texture));
}

#[test]
fn decal_queue_is_drawn_once_and_emptied() {
    let mut engine = prepared(EngineConfig::new(64, 64, 1, 1));
    let decal = engine.create_decal(Sprite::new(8, 8));
    engine.draw_decal(Vec2::new(8.0, 8.0), &decal, Vec2::ONE, WHITE);
    assert_eq!(engine.layers().get(0).unwrap().decals().len(), 1);
    engine.backend_mut().clear_calls();

    engine.core_update(&mut Idle);
    engine.core_update(&mut Idle);

    let drawn = engine
        .backend()
        .calls()
        .iter()
        .filter(|c| matches!(c, BackendCall::DrawDecal(d) if d.decal == decal.id()))
        .count();
    assert_eq!(drawn, 1);
    assert!(engine.layers().get(0).unwrap().decals().is_empty());
}

#[test]
fn set_screen_size_recreates_layer_textures() {
    let mut engine = prepared(EngineConfig::new(32, 32, 2, 2));
    engine.draw(1, 1, RED);
    let old = layer_texture(&engine, 0);

    engine.set_screen_size(64, 16);

    let new = layer_texture(&engine, 0);
    assert_ne!(old, new);
    assert!(engine.backend().texture(old).is_none());
    let texture = engine.backend().texture(new).unwrap();
    assert_eq!((texture.width(), texture.height()), (64, 16));
    assert_eq!(engine.draw_target_width(), 64);
    assert_eq!(engine.screen_size(), Vi2d::new(64, 16));
    assert!(engine.layers().get(0).unwrap().is_dirty());
}

#[test]
fn start_runs_until_update_returns_false() {
    let mut engine = Engine::construct(EngineConfig::default(), HeadlessBackend::new()).unwrap();
    let mut app = StopAfter::new(3);

    engine.start(&mut app).unwrap();

    assert!(app.created);
    assert_eq!(app.seen, 3);
    assert_eq!(app.destroyed, 1);
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.backend().frames_displayed(), 3);
    assert_eq!(engine.backend().texture_count(), 0);
    assert_eq!(engine.backend().calls().last(), Some(&BackendCall::DestroyDevice));
}

#[test]
fn destroy_veto_resumes_the_loop() {
    let mut engine = Engine::construct(EngineConfig::default(), HeadlessBackend::new()).unwrap();
    let mut app = StopAfter::new(2);
    app.vetoes = 1;

    engine.start(&mut app).unwrap();

    assert_eq!(app.destroyed, 2);
    assert_eq!(engine.backend().frames_displayed(), 4);
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn quit_event_ends_the_run_after_the_frame() {
    let mut backend = HeadlessBackend::new();
    backend.push_frame_events([PlatformEvent::Quit]);
    let mut engine = Engine::construct(EngineConfig::default(), backend).unwrap();

    engine.start(&mut Idle).unwrap();

    assert_eq!(engine.backend().frames_displayed(), 1);
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn graphics_failure_prevents_start() {
    let mut engine =
        Engine::construct(EngineConfig::default(), HeadlessBackend::failing()).unwrap();
    let mut app = StopAfter::new(1);

    let result = engine.start(&mut app);

    assert!(matches!(result, Err(EngineError::Graphics(_))));
    assert!(!app.created);
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.backend().frames_displayed(), 0);
}
