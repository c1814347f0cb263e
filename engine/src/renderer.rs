// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod sprite;

use platform::{EngineError, Platform};

pub use sprite::{release_texture, SpriteHandle, Texture};

/// Submits every sprite of a layer to the platform, in order.
pub fn draw_layer<'a>(
    sprites: impl IntoIterator<Item = &'a SpriteHandle>,
    platform: &dyn Platform,
) -> Result<(), EngineError> {
    for sprite in sprites {
        sprite.draw(platform)?;
    }
    Ok(())
}
