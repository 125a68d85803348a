//! GPU-resident images and the one-frame draw commands that reference them.

use crate::backend::{RenderBackend, TextureId};
use crate::colors::{Pixel, WHITE};
use crate::math::Vec2;
use crate::sprite::Sprite;

/// A sprite uploaded to a backend texture.
///
/// The decal owns its sprite; call [`Decal::update`] after editing the
/// sprite to push the changes to the backend.
#[derive(Debug)]
pub struct Decal {
    id: TextureId,
    sprite: Sprite,
    uv_scale: Vec2,
}

impl Decal {
    pub fn new(sprite: Sprite, backend: &mut dyn RenderBackend) -> Self {
        let id = backend.create_texture(sprite.width(), sprite.height());
        let uv_scale = Vec2::new(sprite.width() as f32, sprite.height() as f32).recip();
        let decal = Self {
            id,
            sprite,
            uv_scale,
        };
        decal.update(backend);
        decal
    }

    /// Re-uploads the sprite to the decal's texture.
    pub fn update(&self, backend: &mut dyn RenderBackend) {
        backend.apply_texture(self.id);
        backend.upload_texture(self.id, &self.sprite);
    }

    /// Deletes the backend texture and hands the sprite back.
    pub fn release(self, backend: &mut dyn RenderBackend) -> Sprite {
        backend.delete_texture(self.id);
        self.sprite
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    /// Size of one texel in normalized texture coordinates.
    pub fn uv_scale(&self) -> Vec2 {
        self.uv_scale
    }
}

/// A queued textured quad, drawn during the composite pass of the frame it
/// was queued in and then discarded.
///
/// Positions are normalized device coordinates: `(-1, 1)` is the top-left
/// of the viewport, `(1, -1)` the bottom-right. Vertices run top-left,
/// bottom-left, bottom-right, top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalInstance {
    pub decal: TextureId,
    pub pos: [Vec2; 4],
    pub uv: [Vec2; 4],
    /// Per-vertex depth weights for perspective-correct texturing.
    pub w: [f32; 4],
    pub tint: [Pixel; 4],
}

impl DecalInstance {
    /// An untransformed instance covering the full texture.
    pub fn new(decal: TextureId) -> Self {
        Self {
            decal,
            pos: [Vec2::ZERO; 4],
            uv: [
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
            ],
            w: [1.0; 4],
            tint: [WHITE; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{BackendCall, HeadlessBackend};
    use approx::assert_relative_eq;

    #[test]
    fn new_uploads_sprite() {
        let mut backend = HeadlessBackend::new();
        let decal = Decal::new(Sprite::new(8, 4), &mut backend);

        assert_eq!(backend.texture(decal.id()).map(|s| s.width()), Some(8));
        assert!(backend
            .calls()
            .contains(&BackendCall::UploadTexture(decal.id())));
        assert_relative_eq!(decal.uv_scale().x, 0.125);
        assert_relative_eq!(decal.uv_scale().y, 0.25);
    }

    #[test]
    fn release_deletes_texture() {
        let mut backend = HeadlessBackend::new();
        let decal = Decal::new(Sprite::new(2, 2), &mut backend);
        let id = decal.id();
        let sprite = decal.release(&mut backend);

        assert_eq!(sprite.width(), 2);
        assert!(backend.texture(id).is_none());
    }
}
