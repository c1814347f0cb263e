// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tunable parameters of the game.
//!
//! Everything here has a default matching the shipped assets, and every field
//! can be overridden from the settings file, so a partial `game` section only
//! needs to mention what it changes.

use core::time::Duration;

use serde::Deserialize;

/// The maximum size of the obstacle pool. [`GameConfig::obstacle_pool_size`]
/// is capped at this.
pub const MAX_OBSTACLES: usize = 16;

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub assets: AssetPaths,
    /// Pixels the floor tiles and obstacles move left each frame.
    pub floor_velocity: i32,
    /// Pixels the background tiles move left each frame. Should be smaller
    /// than `floor_velocity` for the parallax effect.
    pub world_velocity: i32,
    /// How much a wrapped floor tile overlaps its left neighbour, to hide
    /// seams.
    pub floor_wrap_overlap: i32,
    /// Same as `floor_wrap_overlap`, for the background tiles.
    pub world_wrap_overlap: i32,
    /// Amount of obstacle sprites, all sharing one texture.
    pub obstacle_pool_size: usize,
    /// How far past the left edge of the screen parked obstacles are kept.
    pub residual_margin: i32,
    /// Transparent rows at the top of the player sprite, not counted when
    /// checking whether the player is high enough to clear an obstacle. Tied
    /// to the player sprite art.
    pub collision_headroom: i32,
    /// The fixed horizontal position of the player.
    pub player_x: i32,
    pub player: PlayerConfig,
    pub jump: JumpConfig,
    pub spawn: SpawnConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            assets: AssetPaths::default(),
            floor_velocity: 5,
            world_velocity: 1,
            floor_wrap_overlap: 15,
            world_wrap_overlap: 0,
            obstacle_pool_size: 6,
            residual_margin: 30,
            collision_headroom: 100,
            player_x: 100,
            player: PlayerConfig::default(),
            jump: JumpConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl GameConfig {
    /// [`GameConfig::obstacle_pool_size`] clamped to `1..=MAX_OBSTACLES`.
    pub fn obstacle_count(&self) -> usize {
        self.obstacle_pool_size.clamp(1, MAX_OBSTACLES)
    }
}

/// Paths of the image and audio files used by the game.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetPaths {
    pub player: String,
    pub floor_tile: String,
    pub world_scene: String,
    pub obstacle: String,
    pub loop_track: String,
    pub jump_effect: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        AssetPaths {
            player: "texture/dino-player.png".into(),
            floor_tile: "texture/base-tile-01.png".into(),
            world_scene: "texture/world-bg.png".into(),
            obstacle: "texture/obstacle-type-01.png".into(),
            loop_track: "audio/game-bgm-score.mp3".into(),
            jump_effect: "audio/cartoon-jump.wav".into(),
        }
    }
}

/// Layout of the player sprite sheet: frames of `clip_width` pixels laid out
/// left to right, the first `running_frames` of them forming the running
/// cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub clip_width: i32,
    pub running_frames: u32,
    pub game_over_frame: u32,
    pub frame_interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            clip_width: 262,
            running_frames: 2,
            game_over_frame: 2,
            frame_interval_ms: 70,
        }
    }
}

impl PlayerConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Shape and pacing of the jump arc.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JumpConfig {
    /// Peak height of the jump in pixels.
    pub amplitude: f32,
    /// Radians the arc phase advances per step. The arc covers 0..=π.
    pub phase_step: f32,
    pub step_delay_ms: u64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        JumpConfig {
            amplitude: 450.0,
            phase_step: 0.01,
            step_delay_ms: 2,
        }
    }
}

impl JumpConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Obstacle respawn pacing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
    /// Minimum time between two obstacles being put back on the conveyor.
    pub min_interval_ms: u64,
    /// Once the interval has passed, each frame has a `1 / chance_denominator`
    /// chance of spawning an obstacle.
    pub chance_denominator: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            min_interval_ms: 1000,
            chance_denominator: 100,
        }
    }
}

impl SpawnConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}
