// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sprite handles: a shared texture plus a per-handle clip and placement.

use std::sync::Arc;

use platform::{EngineError, LoadedSprite, Platform, Rect, SpriteRef};
use tracing::debug;

/// A texture loaded through the platform. Shared between every
/// [`SpriteHandle`] cloned from the same original, and released through the
/// platform by whichever handle is released last.
#[derive(Debug)]
pub struct Texture {
    sprite: SpriteRef,
    width: i32,
    height: i32,
}

impl Texture {
    pub fn sprite(&self) -> SpriteRef {
        self.sprite
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

impl From<LoadedSprite> for Texture {
    fn from(loaded: LoadedSprite) -> Self {
        Texture {
            sprite: loaded.sprite,
            width: loaded.width,
            height: loaded.height,
        }
    }
}

/// One renderable image region.
///
/// Cloning a handle is cheap: the clone shares the texture, but gets its own
/// copy of the clip and placement, which can then be changed independently.
#[derive(Debug, Clone)]
pub struct SpriteHandle {
    texture: Arc<Texture>,
    /// The region of the texture to draw.
    pub clip: Rect,
    /// Where on the screen the clip is drawn.
    pub placement: Rect,
}

impl SpriteHandle {
    /// Loads an image and creates a handle covering the whole texture, placed
    /// at the origin with the texture's own size.
    pub fn load(platform: &dyn Platform, path: &str) -> Result<SpriteHandle, EngineError> {
        let loaded = platform.load_sprite(path)?;
        debug!(
            "Loaded {path} as {:?} ({}x{}).",
            loaded.sprite, loaded.width, loaded.height,
        );
        Ok(SpriteHandle::from_texture(Arc::new(Texture::from(loaded))))
    }

    /// Creates a handle covering the whole texture.
    pub fn from_texture(texture: Arc<Texture>) -> SpriteHandle {
        let whole = Rect::xywh(0, 0, texture.width, texture.height);
        SpriteHandle {
            texture,
            clip: whole,
            placement: whole,
        }
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub fn into_texture(self) -> Arc<Texture> {
        self.texture
    }

    pub fn x(&self) -> i32 {
        self.placement.x
    }

    pub fn y(&self) -> i32 {
        self.placement.y
    }

    pub fn width(&self) -> i32 {
        self.placement.w
    }

    pub fn height(&self) -> i32 {
        self.placement.h
    }

    /// Moves the placement's top-left corner, keeping its size.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.placement = self.placement.at(x, y);
    }

    /// Returns true if both handles draw from the same texture.
    pub fn shares_texture_with(&self, other: &SpriteHandle) -> bool {
        Arc::ptr_eq(&self.texture, &other.texture)
    }

    pub fn draw(&self, platform: &dyn Platform) -> Result<(), EngineError> {
        platform.draw_sprite(self.texture.sprite, self.clip, self.placement)
    }

    /// Drops this handle, freeing the texture through the platform if this
    /// was the last handle referring to it.
    pub fn release(self, platform: &dyn Platform) {
        release_texture(self.texture, platform);
    }
}

/// Frees the texture if `texture` is the last reference to it.
pub fn release_texture(texture: Arc<Texture>, platform: &dyn Platform) {
    if let Some(texture) = Arc::into_inner(texture) {
        debug!("Releasing texture {:?}.", texture.sprite);
        platform.free_sprite(texture.sprite);
    }
}
