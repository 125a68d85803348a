//! A small real-time pixel engine.
//!
//! Applications draw into CPU-side sprites organised as a stack of layers.
//! Each frame the engine samples input, calls the application, then
//! composites the layers (plus any queued decals) through a backend that
//! owns the window and the GPU textures.
//!
//! # Quick Start
//!
//! ```ignore
//! use pixelrig::prelude::*;
//!
//! struct App;
//!
//! impl Application for App {
//!     fn on_update<B: Backend>(&mut self, engine: &mut Engine<B>, _elapsed: f32) -> bool {
//!         engine.draw(10, 10, RED);
//!         !engine.key(Key::Escape).pressed
//!     }
//! }
//!
//! let config = EngineConfig::new(160, 120, 4, 4);
//! let window = SdlWindow::new("demo", config.window_size())?;
//! let mut engine = Engine::construct(config, window)?;
//! engine.start(&mut App)?;
//! ```

// Public API - exposed to library consumers
pub mod backend;
pub mod blend;
pub mod collections;
pub mod colors;
pub mod config;
pub mod decal;
pub mod engine;
pub mod error;
pub mod font;
pub mod headless;
pub mod input;
pub mod layer;
pub mod math;
pub mod sprite;
pub mod timing;
pub mod viewport;
#[cfg(feature = "sdl")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use backend::{Backend, Platform, PlatformEvent, RenderBackend, TextureId};
pub use colors::Pixel;
pub use config::EngineConfig;
pub use engine::{Application, Engine, EngineState};
pub use error::{EngineError, EngineResult};
pub use sprite::Sprite;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use pixelrig::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Application, Engine, EngineState};
    pub use crate::error::{EngineError, EngineResult};

    // Backends
    pub use crate::backend::{Backend, Platform, PlatformEvent, RenderBackend};
    pub use crate::headless::HeadlessBackend;
    #[cfg(feature = "sdl")]
    pub use crate::window::SdlWindow;

    // Drawing
    pub use crate::blend::{PixelBlend, PixelMode};
    pub use crate::colors::*;
    pub use crate::decal::{Decal, DecalInstance};
    pub use crate::layer::RenderHook;
    pub use crate::sprite::{SampleMode, Sprite};

    // Math
    pub use crate::math::{Vec2, Vi2d};

    // Input
    pub use crate::input::{HwButton, Key, MouseButton};
}
