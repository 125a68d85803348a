pub mod vec2;

pub use vec2::{Vec2, Vi2d};
