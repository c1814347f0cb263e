// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The player sprite and the two routines that move it on their own threads.
//!
//! The player's position and animation frame are written by the jump and
//! animation threads while the main thread reads them for drawing and
//! collision checks. Each field is its own [`AtomicCell`], so a read never
//! sees half of a write, but the main thread may see a new `y` with the
//! previous frame index or similar. That race is accepted: it lasts at most
//! one frame and isn't visible. No lock is taken around the fields, which
//! keeps the jump's timing independent of the main loop.

use core::{
    f32::consts::PI,
    sync::atomic::{AtomicBool, Ordering},
};
use std::{sync::Arc, thread};

use crossbeam_utils::atomic::AtomicCell;
use platform::{EngineError, Platform, Rect};
use tracing::trace;

use crate::{
    config::{JumpConfig, PlayerConfig},
    renderer::Texture,
};

/// Flags shared between the main loop and the auxiliary threads.
#[derive(Debug)]
pub struct SessionFlags {
    running: AtomicBool,
    game_over: AtomicBool,
}

impl SessionFlags {
    pub fn new() -> SessionFlags {
        SessionFlags {
            running: AtomicBool::new(true),
            game_over: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::Acquire)
    }

    pub fn set_game_over(&self, game_over: bool) {
        self.game_over.store(game_over, Ordering::Release);
    }
}

impl Default for SessionFlags {
    fn default() -> Self {
        SessionFlags::new()
    }
}

/// The player sprite. Shared with the jump and animation threads through an
/// [`Arc`].
#[derive(Debug)]
pub struct Player {
    texture: Arc<Texture>,
    frame_width: i32,
    frames_in_sheet: u32,
    x: AtomicCell<i32>,
    y: AtomicCell<i32>,
    frame: AtomicCell<u32>,
    jumping: AtomicBool,
}

impl Player {
    /// Creates a player from a sprite sheet of `clip_width` wide frames. If
    /// the texture isn't wider than one clip, the whole texture is one frame.
    pub fn new(texture: Arc<Texture>, clip_width: i32) -> Player {
        let (frame_width, frames_in_sheet) = if 0 < clip_width && clip_width < texture.width() {
            (clip_width, (texture.width() / clip_width) as u32)
        } else {
            (texture.width(), 1)
        };
        Player {
            texture,
            frame_width,
            frames_in_sheet,
            x: AtomicCell::new(0),
            y: AtomicCell::new(0),
            frame: AtomicCell::new(0),
            jumping: AtomicBool::new(false),
        }
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub fn into_texture(self) -> Arc<Texture> {
        self.texture
    }

    pub fn width(&self) -> i32 {
        self.frame_width
    }

    pub fn height(&self) -> i32 {
        self.texture.height()
    }

    pub fn x(&self) -> i32 {
        self.x.load()
    }

    pub fn y(&self) -> i32 {
        self.y.load()
    }

    pub fn set_position(&self, x: i32, y: i32) {
        self.x.store(x);
        self.y.store(y);
    }

    pub fn set_y(&self, y: i32) {
        self.y.store(y);
    }

    pub fn frame(&self) -> u32 {
        self.frame.load()
    }

    pub fn set_frame(&self, frame: u32) {
        self.frame.store(frame.min(self.frames_in_sheet - 1));
    }

    /// How many animation frames the sprite sheet holds.
    pub fn frames_in_sheet(&self) -> u32 {
        self.frames_in_sheet
    }

    pub fn is_animated(&self) -> bool {
        self.frames_in_sheet > 1
    }

    /// The region of the sprite sheet for the current frame.
    pub fn clip(&self) -> Rect {
        Rect::xywh(
            self.frame() as i32 * self.frame_width,
            0,
            self.frame_width,
            self.height(),
        )
    }

    pub fn placement(&self) -> Rect {
        Rect::xywh(self.x(), self.y(), self.frame_width, self.height())
    }

    pub fn draw(&self, platform: &dyn Platform) -> Result<(), EngineError> {
        platform.draw_sprite(self.texture.sprite(), self.clip(), self.placement())
    }

    /// Marks a jump as being in flight, unless one already is. The returned
    /// guard clears the mark when dropped, however the jump ends.
    pub fn try_begin_jump(self: &Arc<Self>) -> Option<JumpGuard> {
        self.jumping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(JumpGuard {
            player: self.clone(),
        })
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping.load(Ordering::Acquire)
    }
}

/// Proof of holding the player's jump-in-flight lock. See
/// [`Player::try_begin_jump`].
#[derive(Debug)]
pub struct JumpGuard {
    player: Arc<Player>,
}

impl JumpGuard {
    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }
}

impl Drop for JumpGuard {
    fn drop(&mut self) {
        self.player.jumping.store(false, Ordering::Release);
    }
}

/// The vertical positions of a jump starting and ending at `rest_y`: a half
/// sine wave, sampled every `phase_step` radians from 0 to π.
pub fn jump_arc(rest_y: i32, config: &JumpConfig) -> impl Iterator<Item = i32> {
    let step = if config.phase_step > 0.0 {
        config.phase_step
    } else {
        JumpConfig::default().phase_step
    };
    let amplitude = config.amplitude;
    let steps = (PI / step) as u32;
    (0..=steps).map(move |i| rest_y - (amplitude * (i as f32 * step).sin()) as i32)
}

/// Moves the player along [`jump_arc`], sleeping between the steps. Meant to
/// be run on its own thread.
///
/// Stops early, leaving the player where it is, if the game ends or the
/// session stops mid-jump. The jump lock is released on every exit path when
/// `guard` is dropped.
pub fn run_jump(guard: JumpGuard, flags: Arc<SessionFlags>, rest_y: i32, config: JumpConfig) {
    let player = guard.player();
    let step_delay = config.step_delay();

    for y in jump_arc(rest_y, &config) {
        if flags.is_game_over() || !flags.is_running() {
            trace!("Jump aborted at y = {}.", player.y());
            return;
        }
        player.set_y(y);
        if !step_delay.is_zero() {
            thread::sleep(step_delay);
        }
    }

    player.set_y(rest_y);
}

/// Which frame of the sprite sheet to show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCycle {
    running_frames: u32,
    game_over_frame: u32,
}

impl AnimationCycle {
    pub fn new(config: &PlayerConfig, frames_in_sheet: u32) -> AnimationCycle {
        let frames_in_sheet = frames_in_sheet.max(1);
        AnimationCycle {
            running_frames: config.running_frames.clamp(1, frames_in_sheet),
            game_over_frame: config.game_over_frame.min(frames_in_sheet - 1),
        }
    }

    /// Cycles through the running frames, or holds the game over frame while
    /// the game is over.
    pub fn next(&self, current: u32, game_over: bool) -> u32 {
        if game_over {
            self.game_over_frame
        } else {
            (current + 1) % self.running_frames
        }
    }
}

/// Advances the player's animation frame every `frame_interval` until the
/// session stops. Meant to be run on its own thread.
pub fn run_animation(player: Arc<Player>, flags: Arc<SessionFlags>, config: PlayerConfig) {
    let cycle = AnimationCycle::new(&config, player.frames_in_sheet());
    let interval = config.frame_interval();

    while flags.is_running() {
        player.set_frame(cycle.next(player.frame(), flags.is_game_over()));
        thread::sleep(interval);
    }

    trace!("Animation thread finished.");
}
