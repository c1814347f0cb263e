// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The game itself: an endless runner where the player jumps over obstacles
//! scrolling in from the right. Everything platform-specific goes through
//! [`platform::Platform`], so the whole game can be tested without a window.

pub mod config;
pub mod input;
pub mod obstacles;
pub mod player;
pub mod platformer;
pub mod renderer;
pub mod world;

#[cfg(test)]
mod test_platform;

pub use config::GameConfig;
pub use platformer::{GameState, Platformer};
