// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

/// An integer axis-aligned rectangle, in pixels.
///
/// Used both for texture clips (which part of a texture to sample) and for
/// placements (where on the screen to draw).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// The horizontal coordinate of the top-left corner of the rectangle.
    pub x: i32,
    /// The vertical coordinate of the top-left corner of the rectangle.
    pub y: i32,
    /// The width of the rectangle.
    pub w: i32,
    /// The height of the rectangle.
    pub h: i32,
}

impl Rect {
    /// Creates a new [`Rect`] from a given top-left corner and dimensions.
    pub const fn xywh(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect { x, y, w, h }
    }

    /// Returns a copy of this rectangle moved to the given top-left corner.
    pub const fn at(self, x: i32, y: i32) -> Rect {
        Rect { x, y, ..self }
    }
}

/// Platform-specific texture reference. No guarantees about the texture
/// actually existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteRef(u64);

impl SpriteRef {
    /// Creates a new [`SpriteRef`]. Should only be created in the platform
    /// implementation, which also knows how the inner value is going to be
    /// used.
    pub fn new(id: u64) -> SpriteRef {
        SpriteRef(id)
    }

    /// Returns the inner value passed into [`SpriteRef::new`]. Generally only
    /// relevant to the platform implementation.
    pub fn inner(self) -> u64 {
        self.0
    }
}

/// A texture created by [`Platform::load_sprite`](crate::Platform::load_sprite),
/// with the dimensions of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedSprite {
    /// The texture.
    pub sprite: SpriteRef,
    /// Width of the whole texture in pixels.
    pub width: i32,
    /// Height of the whole texture in pixels.
    pub height: i32,
}
