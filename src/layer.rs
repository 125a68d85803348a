//! Layers and the per-frame composite pass.
//!
//! Every layer owns a screen-sized [`Sprite`] mirrored into a backend
//! texture, a texture-space transform, a tint, and the decals queued
//! against it this frame. Layer 0 is the base frame: always present, always
//! visible, and re-uploaded every frame.
//!
//! # Draw order
//!
//! The composite pass draws layer 0 first, then the remaining layers from
//! the highest index down to 1. A later-created layer is therefore drawn
//! earlier and can be covered by a layer created before it.
//!
//! Layers are append-only: there is no removal.

use tracing::{debug, trace};

use crate::backend::{RenderBackend, TextureId};
use crate::collections::DynArray;
use crate::colors::{Pixel, WHITE};
use crate::decal::DecalInstance;
use crate::math::{Vec2, Vi2d};
use crate::sprite::Sprite;

/// Replaces standard compositing for one layer.
///
/// The hook gets the backend and nothing else; it is responsible for all of
/// the layer's drawing.
pub trait RenderHook {
    fn render(&mut self, backend: &mut dyn RenderBackend);
}

impl<F> RenderHook for F
where
    F: FnMut(&mut dyn RenderBackend),
{
    fn render(&mut self, backend: &mut dyn RenderBackend) {
        self(backend)
    }
}

pub struct Layer {
    target: Sprite,
    offset: Vec2,
    scale: Vec2,
    tint: Pixel,
    visible: bool,
    dirty: bool,
    texture: TextureId,
    hook: Option<Box<dyn RenderHook>>,
    decals: DynArray<DecalInstance>,
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("size", &(self.target.width(), self.target.height()))
            .field("offset", &self.offset)
            .field("scale", &self.scale)
            .field("tint", &self.tint)
            .field("visible", &self.visible)
            .field("dirty", &self.dirty)
            .field("texture", &self.texture)
            .field("hook", &self.hook.is_some())
            .field("decals", &self.decals.len())
            .finish()
    }
}

impl Layer {
    pub fn sprite(&self) -> &Sprite {
        &self.target
    }

    pub fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.target
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn tint(&self) -> Pixel {
        self.tint
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    pub fn decals(&self) -> &DynArray<DecalInstance> {
        &self.decals
    }

    /// Standard compositing for one visible layer.
    fn draw(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(hook) = self.hook.as_mut() {
            hook.render(backend);
            return;
        }

        backend.apply_texture(self.texture);
        if self.dirty {
            backend.upload_texture(self.texture, &self.target);
            self.dirty = false;
        }

        backend.draw_quad(self.offset, self.scale, self.tint);

        for decal in &self.decals {
            backend.draw_decal(decal);
        }
    }
}

/// Ordered collection of layers. Index 0 is the base layer.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: DynArray<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Appends a blank screen-sized layer with its own texture and returns
    /// its index.
    pub fn create_layer(&mut self, size: Vi2d, backend: &mut dyn RenderBackend) -> usize {
        let (width, height) = (size.x.max(0) as u32, size.y.max(0) as u32);
        let target = Sprite::new(width, height);
        let texture = backend.create_texture(width, height);
        backend.apply_texture(texture);
        backend.upload_texture(texture, &target);

        let index = self.layers.push(Layer {
            target,
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
            tint: WHITE,
            visible: false,
            dirty: false,
            texture,
            hook: None,
            decals: DynArray::new(),
        });
        debug!(index, width, height, texture = texture.0, "created layer");
        index
    }

    fn with_layer(&mut self, index: usize, f: impl FnOnce(&mut Layer)) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                f(layer);
                true
            }
            None => {
                trace!(index, "ignoring out-of-range layer");
                false
            }
        }
    }

    /// Marks the layer as the drawing target: its sprite will be uploaded at
    /// the next composite.
    pub fn mark_draw_target(&mut self, index: usize) -> bool {
        self.with_layer(index, |l| l.dirty = true)
    }

    pub fn enable(&mut self, index: usize, visible: bool) {
        self.with_layer(index, |l| l.visible = visible);
    }

    pub fn set_offset(&mut self, index: usize, offset: Vec2) {
        self.with_layer(index, |l| l.offset = offset);
    }

    pub fn set_scale(&mut self, index: usize, scale: Vec2) {
        self.with_layer(index, |l| l.scale = scale);
    }

    pub fn set_tint(&mut self, index: usize, tint: Pixel) {
        self.with_layer(index, |l| l.tint = tint);
    }

    pub fn set_hook(&mut self, index: usize, hook: Option<Box<dyn RenderHook>>) {
        self.with_layer(index, |l| l.hook = hook);
    }

    /// Queues a decal on a layer for this frame. Out of range is a no-op.
    pub fn queue_decal(&mut self, index: usize, decal: DecalInstance) -> bool {
        self.with_layer(index, |l| {
            l.decals.push(decal);
        })
    }

    /// Turns every visible layer into backend draw calls.
    ///
    /// Every decal queue is empty when this returns, including those of
    /// hidden and hooked layers.
    pub fn composite(&mut self, backend: &mut dyn RenderBackend) {
        backend.prepare_drawing();

        if let Some(base) = self.layers.get_mut(0) {
            base.dirty = true;
            base.visible = true;
            base.draw(backend);
        }

        for index in (1..self.layers.len()).rev() {
            if let Some(layer) = self.layers.get_mut(index) {
                if layer.visible {
                    layer.draw(backend);
                }
            }
        }

        for layer in &mut self.layers {
            layer.decals.clear();
        }
    }

    /// Recreates every layer's sprite and texture at the new size. All
    /// layers are marked dirty so the next composite re-uploads them.
    pub fn resize(&mut self, size: Vi2d, backend: &mut dyn RenderBackend) {
        let (width, height) = (size.x.max(0) as u32, size.y.max(0) as u32);
        for layer in &mut self.layers {
            let old = std::mem::replace(&mut layer.target, Sprite::new(0, 0));
            layer.target = old.resized(width, height);

            backend.delete_texture(layer.texture);
            layer.texture = backend.create_texture(width, height);
            layer.dirty = true;
        }
        debug!(width, height, layers = self.layers.len(), "resized layers");
    }

    /// Deletes every layer's texture and empties the stack.
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        for layer in &self.layers {
            backend.delete_texture(layer.texture);
        }
        self.layers.clear();
    }
}
