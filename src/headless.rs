//! In-memory backend that records every call.
//!
//! [`HeadlessBackend`] keeps uploaded textures as sprites and logs each call
//! as a [`BackendCall`], which makes frame output and call ordering
//! inspectable without a window. Input is scripted: each queued batch of
//! [`PlatformEvent`]s is delivered by one `pump_events` call.

use std::collections::{BTreeMap, VecDeque};

use crate::backend::{Platform, PlatformEvent, RenderBackend, TextureId};
use crate::colors::Pixel;
use crate::decal::DecalInstance;
use crate::error::{EngineError, EngineResult};
use crate::math::{Vec2, Vi2d};
use crate::sprite::Sprite;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateGraphics { fullscreen: bool, vsync: bool },
    CreateTexture { id: TextureId, width: u32, height: u32 },
    DeleteTexture(TextureId),
    ApplyTexture(TextureId),
    UploadTexture(TextureId),
    PrepareDrawing,
    DrawQuad {
        texture: Option<TextureId>,
        offset: Vec2,
        scale: Vec2,
        tint: Pixel,
    },
    DrawDecal(DecalInstance),
    Clear { color: Pixel, depth: bool },
    DisplayFrame,
    SetViewport { pos: Vi2d, size: Vi2d },
    SetTitle(String),
    DestroyDevice,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    calls: Vec<BackendCall>,
    textures: BTreeMap<TextureId, Sprite>,
    next_texture: u32,
    applied: Option<TextureId>,
    script: VecDeque<Vec<PlatformEvent>>,
    fail_graphics: bool,
    frames: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `create_graphics` fails.
    pub fn failing() -> Self {
        Self {
            fail_graphics: true,
            ..Self::default()
        }
    }

    /// Queues a batch of events delivered by the next pump.
    pub fn push_frame_events(&mut self, events: impl IntoIterator<Item = PlatformEvent>) {
        self.script.push_back(events.into_iter().collect());
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Last uploaded contents of a texture.
    pub fn texture(&self, id: TextureId) -> Option<&Sprite> {
        self.textures.get(&id)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn frames_displayed(&self) -> u64 {
        self.frames
    }

    /// Textures drawn with `draw_quad`, in call order.
    pub fn quad_textures(&self) -> Vec<TextureId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::DrawQuad { texture, .. } => *texture,
                _ => None,
            })
            .collect()
    }
}

impl Platform for HeadlessBackend {
    fn create_graphics(
        &mut self,
        fullscreen: bool,
        vsync: bool,
        _view_pos: Vi2d,
        _view_size: Vi2d,
    ) -> EngineResult<()> {
        if self.fail_graphics {
            return Err(EngineError::graphics("headless context refused"));
        }
        self.calls
            .push(BackendCall::CreateGraphics { fullscreen, vsync });
        Ok(())
    }

    fn pump_events(&mut self, events: &mut Vec<PlatformEvent>) {
        if let Some(batch) = self.script.pop_front() {
            events.extend(batch);
        }
    }

    fn set_window_title(&mut self, title: &str) {
        self.calls.push(BackendCall::SetTitle(title.to_string()));
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_texture(&mut self, width: u32, height: u32) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, Sprite::new(width, height));
        self.calls
            .push(BackendCall::CreateTexture { id, width, height });
        id
    }

    fn delete_texture(&mut self, id: TextureId) {
        self.textures.remove(&id);
        if self.applied == Some(id) {
            self.applied = None;
        }
        self.calls.push(BackendCall::DeleteTexture(id));
    }

    fn apply_texture(&mut self, id: TextureId) {
        self.applied = Some(id);
        self.calls.push(BackendCall::ApplyTexture(id));
    }

    fn upload_texture(&mut self, id: TextureId, sprite: &Sprite) {
        if let Some(slot) = self.textures.get_mut(&id) {
            slot.clone_from(sprite);
        }
        self.calls.push(BackendCall::UploadTexture(id));
    }

    fn prepare_drawing(&mut self) {
        self.calls.push(BackendCall::PrepareDrawing);
    }

    fn draw_quad(&mut self, offset: Vec2, scale: Vec2, tint: Pixel) {
        self.calls.push(BackendCall::DrawQuad {
            texture: self.applied,
            offset,
            scale,
            tint,
        });
    }

    fn draw_decal(&mut self, decal: &DecalInstance) {
        self.calls.push(BackendCall::DrawDecal(*decal));
    }

    fn clear(&mut self, color: Pixel, depth: bool) {
        self.calls.push(BackendCall::Clear { color, depth });
    }

    fn display_frame(&mut self) {
        self.frames += 1;
        self.calls.push(BackendCall::DisplayFrame);
    }

    fn set_viewport(&mut self, pos: Vi2d, size: Vi2d) {
        self.calls.push(BackendCall::SetViewport { pos, size });
    }

    fn destroy_device(&mut self) {
        self.textures.clear();
        self.calls.push(BackendCall::DestroyDevice);
    }
}
