// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! This crate mainly revolves around the [`Platform`] trait, which can be
//! implemented to provide a "platform implementation" for the game. The game
//! itself only ever talks to the window, the renderer, the audio device and
//! the input devices through it.
//!
//! This is split off of the engine crate so that the engine and the platform
//! implementation can be compiled (and tested) independently: the engine's
//! tests use a deterministic in-memory platform instead of SDL.

#![warn(missing_docs)]

mod error;
mod input;
mod render;
mod time;

pub use error::*;
pub use input::*;
pub use render::*;
pub use time::*;

/// Identifier for a sound effect loaded with [`Platform::load_effect`].
pub type EffectId = u32;

/// A trait for using platform-dependent features from the game without
/// depending on any platform implementation directly.
///
/// All the functions have a `&self` parameter, so that the methods can access
/// some (possibly internally mutable) state, but still keeping the platform
/// object as widely usable as possible (a "platform" is about as global an
/// object as you get). The trait is object safe, and the game only uses it
/// through `&dyn Platform`.
///
/// A platform is only ever used from the thread that created it. The game's
/// auxiliary threads never touch it.
pub trait Platform {
    /// Get the size of the drawable area, in the same coordinate system as the
    /// placement rectangles passed into [`Platform::draw_sprite`].
    fn draw_area(&self) -> (i32, i32);

    /// Load an image file into a texture that can be drawn with
    /// [`Platform::draw_sprite`].
    fn load_sprite(&self, path: &str) -> Result<LoadedSprite, EngineError>;

    /// Release a texture created by [`Platform::load_sprite`]. The reference
    /// must not be drawn after this.
    fn free_sprite(&self, sprite: SpriteRef);

    /// Clear the frame before drawing the next one.
    fn clear(&self) -> Result<(), EngineError>;

    /// Copy the `clip` region of the texture into the `placement` region of
    /// the frame.
    fn draw_sprite(&self, sprite: SpriteRef, clip: Rect, placement: Rect)
        -> Result<(), EngineError>;

    /// Present the frame. May sleep to cap the frame rate.
    fn commit(&self);

    /// Blocks while playing a full-screen color fade.
    fn fade_transition(&self) -> Result<(), EngineError>;

    /// Load a music track to be looped with [`Platform::play_loop`], replacing
    /// (and stopping) any previously loaded track.
    fn load_loop_track(&self, path: &str) -> Result<(), EngineError>;

    /// Start looping the loaded track from its beginning. Does nothing if the
    /// track is already playing, or if no track has been loaded.
    fn play_loop(&self) -> Result<(), EngineError>;

    /// Pause the looping track. Does nothing if it isn't playing.
    fn pause_loop(&self);

    /// Load a sound effect and map it to the given identifier.
    fn load_effect(&self, id: EffectId, path: &str) -> Result<(), EngineError>;

    /// Play a sound effect once. Unknown identifiers are ignored.
    fn play_effect(&self, id: EffectId);

    /// Returns the next pending input event, if any. Never blocks.
    fn poll_event(&self) -> Option<Event>;

    /// Get the button bound to one of the game's action categories, if one is
    /// bound.
    fn default_button_for_action(&self, action: ActionCategory) -> Option<Button>;

    /// Returns the current point in time according to the platform
    /// implementation.
    fn now(&self) -> Instant;

    /// Returns a random integer. No guarantees about the distribution beyond
    /// "good enough for games."
    fn random_u32(&self) -> u32;
}
