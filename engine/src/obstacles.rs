// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The obstacle pool.
//!
//! Obstacles are never created or destroyed while playing. Each one is either
//! on the conveyor (scrolling left and checked for collisions) or parked just
//! off the left edge of the screen, waiting in the residual queue to be put
//! back on the right edge.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use platform::Instant;
use tracing::{debug, trace};

use crate::{
    config::{SpawnConfig, MAX_OBSTACLES},
    renderer::SpriteHandle,
};

/// Result of [`ObstaclePool::try_respawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnStatus {
    /// The residual queue is too short or the last spawn was too recent.
    NotAttempted,
    /// The random draw decided against spawning this time.
    NotSelected,
    /// The obstacle in the given pool slot was put back on the conveyor.
    Spawned(usize),
}

#[derive(Debug)]
struct Obstacle {
    sprite: SpriteHandle,
    parked: bool,
}

#[derive(Debug)]
pub struct ObstaclePool {
    obstacles: ArrayVec<Obstacle, MAX_OBSTACLES>,
    /// Pool slots of the parked obstacles, in the order they were parked.
    residual: VecDeque<usize>,
}

impl ObstaclePool {
    /// Creates a pool of `count` obstacles (capped at [`MAX_OBSTACLES`]): the
    /// given sprite and clones of it, all at the sprite's position.
    pub fn new(sprite: SpriteHandle, count: usize) -> ObstaclePool {
        let mut obstacles = ArrayVec::new();
        for _ in 1..count.clamp(1, MAX_OBSTACLES) {
            obstacles.push(Obstacle {
                sprite: sprite.clone(),
                parked: false,
            });
        }
        obstacles.insert(
            0,
            Obstacle {
                sprite,
                parked: false,
            },
        );
        ObstaclePool {
            obstacles,
            residual: VecDeque::with_capacity(MAX_OBSTACLES),
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn sprites(&self) -> impl Iterator<Item = &SpriteHandle> {
        self.obstacles.iter().map(|obstacle| &obstacle.sprite)
    }

    pub fn sprite(&self, index: usize) -> &SpriteHandle {
        &self.obstacles[index].sprite
    }

    pub fn sprite_mut(&mut self, index: usize) -> &mut SpriteHandle {
        &mut self.obstacles[index].sprite
    }

    pub fn is_parked(&self, index: usize) -> bool {
        self.obstacles[index].parked
    }

    /// Amount of obstacles on the conveyor.
    pub fn active_count(&self) -> usize {
        self.obstacles.iter().filter(|o| !o.parked).count()
    }

    /// Amount of obstacles waiting in the residual queue.
    pub fn residual_len(&self) -> usize {
        self.residual.len()
    }

    /// Puts every obstacle back on the conveyor at `x`, keeping their
    /// vertical positions, and empties the residual queue.
    pub fn reset(&mut self, x: i32) {
        for obstacle in &mut self.obstacles {
            let y = obstacle.sprite.y();
            obstacle.sprite.set_position(x, y);
            obstacle.parked = false;
        }
        self.residual.clear();
    }

    /// Moves every obstacle on the conveyor left by `velocity`, parking the
    /// ones that have gone fully off-screen `margin` pixels past the left
    /// edge.
    ///
    /// After each move, `collides` is called with the moved sprite. If it
    /// returns true, scrolling stops there and the pool slot of that obstacle
    /// is returned. Obstacles after it are left as they were.
    pub fn scroll(
        &mut self,
        velocity: i32,
        margin: i32,
        mut collides: impl FnMut(&SpriteHandle) -> bool,
    ) -> Option<usize> {
        for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
            if obstacle.parked {
                continue;
            }

            let sprite = &mut obstacle.sprite;
            let (x, y) = (sprite.x(), sprite.y());
            if x <= -sprite.width() {
                sprite.set_position(-sprite.width() - margin, y);
                obstacle.parked = true;
                self.residual.push_back(index);
                trace!("Parked obstacle {index}.");
                continue;
            }

            sprite.set_position(x - velocity, y);
            if collides(sprite) {
                return Some(index);
            }
        }
        None
    }

    /// Puts the oldest parked obstacle back on the conveyor at `spawn_x`, if
    /// more than one obstacle is parked, at least the minimum interval has
    /// passed since `last_spawn`, and a random draw from `random` says so.
    ///
    /// `random` is only called once the other conditions pass. On a spawn,
    /// `last_spawn` is set to `now`.
    pub fn try_respawn(
        &mut self,
        now: Instant,
        last_spawn: &mut Instant,
        config: &SpawnConfig,
        spawn_x: i32,
        random: impl FnOnce() -> u32,
    ) -> SpawnStatus {
        if self.residual.len() <= 1 {
            return SpawnStatus::NotAttempted;
        }

        if now.saturating_duration_since(*last_spawn) < config.min_interval() {
            return SpawnStatus::NotAttempted;
        }

        if random() % config.chance_denominator.max(1) != 0 {
            return SpawnStatus::NotSelected;
        }

        let Some(index) = self.residual.pop_front() else {
            return SpawnStatus::NotAttempted;
        };
        let obstacle = &mut self.obstacles[index];
        let y = obstacle.sprite.y();
        obstacle.sprite.set_position(spawn_x, y);
        obstacle.parked = false;
        *last_spawn = now;
        debug!("Spawned obstacle {index}, {} left in reserve.", self.residual.len());

        SpawnStatus::Spawned(index)
    }

    /// Consumes the pool, returning the sprites.
    pub fn into_sprites(self) -> impl Iterator<Item = SpriteHandle> {
        self.obstacles.into_iter().map(|obstacle| obstacle.sprite)
    }
}
