use pixelrig::prelude::*;
use tracing_subscriber::EnvFilter;

/// Paint with the left mouse button, clear with C, toggle the overlay
/// layer with Space, quit with Escape.
struct Sketchpad {
    overlay: usize,
    brush: Pixel,
    badge: Option<Decal>,
}

impl Application for Sketchpad {
    fn on_create<B: Backend>(&mut self, engine: &mut Engine<B>) -> bool {
        self.overlay = engine.create_layer();
        engine.enable_layer(self.overlay, true);
        engine.set_layer_tint(self.overlay, Pixel::rgba(255, 255, 255, 160));

        let mut badge = Sprite::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let c = if (x + y) % 2 == 0 { YELLOW } else { DARK_BLUE };
                badge.set_pixel(x, y, c);
            }
        }
        self.badge = Some(engine.create_decal(badge));

        engine.set_layer_draw_target(0);
        engine.clear(VERY_DARK_GREY);
        true
    }

    fn on_update<B: Backend>(&mut self, engine: &mut Engine<B>, _elapsed: f32) -> bool {
        let (mx, my) = (engine.mouse_x(), engine.mouse_y());

        if engine.key(Key::C).pressed {
            engine.set_layer_draw_target(0);
            engine.clear(VERY_DARK_GREY);
        }
        if engine.key(Key::Space).pressed {
            let visible = engine
                .layers()
                .get(self.overlay)
                .is_some_and(|layer| layer.is_visible());
            engine.enable_layer(self.overlay, !visible);
        }
        if engine.mouse_wheel() > 0 {
            self.brush = CYAN;
        } else if engine.mouse_wheel() < 0 {
            self.brush = MAGENTA;
        }

        engine.set_layer_draw_target(0);
        if engine.mouse(MouseButton::Left.index()).held {
            engine.fill_rect(mx - 1, my - 1, 3, 3, self.brush);
        }

        engine.set_layer_draw_target(self.overlay);
        engine.clear(BLANK);
        engine.set_pixel_mode(PixelMode::Mask);
        engine.draw_rect(mx - 3, my - 3, 6, 6, WHITE);
        engine.draw_string(2, 2, &format!("{},{}", mx, my), WHITE, 1);
        engine.set_pixel_mode(PixelMode::Normal);

        if let Some(badge) = self.badge.as_ref() {
            let pos = Vec2::new(engine.screen_width() as f32 - 20.0, 4.0);
            engine.draw_decal(pos, badge, Vec2::new(2.0, 2.0), WHITE);
        }
        engine.draw_string_decal(Vec2::new(2.0, 12.0), "pixelrig", GREY, Vec2::ONE);

        !engine.key(Key::Escape).pressed
    }

    fn on_destroy<B: Backend>(&mut self, engine: &mut Engine<B>) -> bool {
        if let Some(badge) = self.badge.take() {
            engine.release_decal(badge);
        }
        true
    }
}

fn main() -> EngineResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::new(160, 120, 4, 4)
        .with_app_name("pixelrig sketchpad")
        .with_frame_cap(Some(60));
    let window = SdlWindow::new(&config.app_name, config.window_size())?;
    let mut engine = Engine::construct(config, window)?;

    let mut app = Sketchpad {
        overlay: 0,
        brush: WHITE,
        badge: None,
    };
    engine.start(&mut app)
}
