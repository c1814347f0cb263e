// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The scrolling world: two looping conveyors of tiles (the floor and the
//! slower background behind it), the obstacle pool, and the player.

use std::sync::Arc;

use arrayvec::ArrayVec;
use platform::{EngineError, Platform, Rect};
use tracing::{debug, warn};

use crate::{
    config::GameConfig,
    obstacles::ObstaclePool,
    player::Player,
    renderer::{draw_layer, release_texture, SpriteHandle},
};

/// Result of [`World::scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollResult {
    Scrolled,
    /// The player ran into the obstacle in the given pool slot.
    Collided(usize),
}

/// How many tiles of `tile_width` are needed to keep an `area_width` wide
/// screen covered while the tiles scroll and wrap around.
pub fn tile_count(area_width: i32, tile_width: i32) -> usize {
    if tile_width <= 0 {
        return 1;
    }
    (area_width.max(0) as u32).div_ceil(tile_width as u32) as usize + 1
}

/// Returns true if an obstacle at `obstacle` hits a player at `player`.
///
/// This isn't a rectangle intersection test: the obstacle has to be less than
/// one player width ahead of the player's left edge, and the bottom of the
/// player's hitbox (the sprite minus `headroom` pixels of empty space on top)
/// has to be below the obstacle's top edge.
pub fn collides(player: Rect, obstacle: Rect, headroom: i32) -> bool {
    let distance = obstacle.x - player.x;
    let elevation = player.y + (player.h - headroom);
    0 < distance && distance < player.w && elevation > obstacle.y
}

/// Moves each tile of a conveyor left by `velocity`, moving tiles that have
/// gone fully off the left edge to the end of the conveyor.
fn scroll_conveyor(tiles: &mut [SpriteHandle], velocity: i32, overlap: i32) {
    let count = tiles.len() as i32;
    for tile in tiles {
        let mut x = tile.x() - velocity;
        if x <= -tile.width() {
            x = (count - 1) * tile.width() - overlap;
        }
        let y = tile.y();
        tile.set_position(x, y);
    }
}

fn lay_out_conveyor(tiles: &mut [SpriteHandle], y: i32) {
    let mut next_x = 0;
    for tile in tiles {
        tile.set_position(next_x, y);
        next_x += tile.width();
    }
}

#[derive(Debug)]
pub struct World {
    area: (i32, i32),
    base_tiles: Vec<SpriteHandle>,
    world_scene: Vec<SpriteHandle>,
    obstacles: ObstaclePool,
    player: Arc<Player>,
    config: GameConfig,
}

impl World {
    /// Loads the world's images and lays out the initial scene. Fails without
    /// creating anything if any image can't be loaded: the images loaded
    /// before the failing one are released.
    pub fn create(platform: &dyn Platform, config: &GameConfig) -> Result<World, EngineError> {
        let assets = &config.assets;
        let paths = [
            &assets.floor_tile,
            &assets.world_scene,
            &assets.obstacle,
            &assets.player,
        ];

        let mut sprites = ArrayVec::<SpriteHandle, 4>::new();
        for path in paths {
            match SpriteHandle::load(platform, path) {
                Ok(sprite) => sprites.push(sprite),
                Err(err) => {
                    for sprite in sprites {
                        sprite.release(platform);
                    }
                    return Err(err);
                }
            }
        }
        let Ok([floor_tile, world_scene, obstacle, player]) = sprites.into_inner() else {
            unreachable!("every world sprite was loaded above");
        };
        let player = Player::new(player.into_texture(), config.player.clip_width);

        Ok(World::from_sprites(
            platform.draw_area(),
            floor_tile,
            world_scene,
            obstacle,
            Arc::new(player),
            config,
        ))
    }

    /// Lays out the initial scene from already loaded sprites. Each layer
    /// sprite is cloned as many times as needed to cover `area`.
    pub fn from_sprites(
        area: (i32, i32),
        floor_tile: SpriteHandle,
        world_scene: SpriteHandle,
        obstacle: SpriteHandle,
        player: Arc<Player>,
        config: &GameConfig,
    ) -> World {
        let (area_width, _) = area;
        let base_tiles = vec![floor_tile.clone(); tile_count(area_width, floor_tile.width())];
        let world_scene = vec![world_scene.clone(); tile_count(area_width, world_scene.width())];
        let obstacles = ObstaclePool::new(obstacle, config.obstacle_count());

        let mut world = World {
            area,
            base_tiles,
            world_scene,
            obstacles,
            player,
            config: config.clone(),
        };
        world.lay_out();
        debug!(
            "Created a world with {} floor tiles, {} background tiles and {} obstacles.",
            world.base_tiles.len(),
            world.world_scene.len(),
            world.obstacles.len(),
        );
        world
    }

    /// Puts everything in its initial position without touching the loaded
    /// textures, and empties the residual queue.
    pub fn reset(&mut self) {
        self.lay_out();
    }

    fn lay_out(&mut self) {
        let floor_line = self.floor_line();
        let scene_height = self.world_scene.first().map_or(0, SpriteHandle::height);
        lay_out_conveyor(&mut self.base_tiles, floor_line);
        lay_out_conveyor(&mut self.world_scene, floor_line - scene_height);

        let obstacle_height = self.obstacles.sprite(0).height();
        for index in 0..self.obstacles.len() {
            let sprite = self.obstacles.sprite_mut(index);
            sprite.set_position(0, floor_line - obstacle_height);
        }
        self.obstacles.reset(self.area.0);

        self.player
            .set_position(self.config.player_x, self.player_rest_y());
    }

    /// The y coordinate of the top of the floor.
    pub fn floor_line(&self) -> i32 {
        self.area.1 - self.base_tiles.first().map_or(0, SpriteHandle::height)
    }

    /// The y coordinate of the player when standing on the floor.
    pub fn player_rest_y(&self) -> i32 {
        self.floor_line() - self.player.height()
    }

    /// Scrolls every layer by one frame's worth and checks the moved
    /// obstacles against the player. Stops at the first collision.
    pub fn scroll(&mut self) -> ScrollResult {
        let config = &self.config;
        scroll_conveyor(
            &mut self.base_tiles,
            config.floor_velocity,
            config.floor_wrap_overlap,
        );
        scroll_conveyor(
            &mut self.world_scene,
            config.world_velocity,
            config.world_wrap_overlap,
        );

        let player = self.player.placement();
        let headroom = config.collision_headroom;
        let hit = self
            .obstacles
            .scroll(config.floor_velocity, config.residual_margin, |obstacle| {
                collides(player, obstacle.placement, headroom)
            });

        match hit {
            Some(index) => ScrollResult::Collided(index),
            None => ScrollResult::Scrolled,
        }
    }

    /// Draws the background, the floor, the obstacles, and the player, in that
    /// order.
    pub fn draw(&self, platform: &dyn Platform) -> Result<(), EngineError> {
        draw_layer(&self.world_scene, platform)?;
        draw_layer(&self.base_tiles, platform)?;
        draw_layer(self.obstacles.sprites(), platform)?;
        self.player.draw(platform)
    }

    /// Releases every texture of the world through the platform. The player
    /// must not be shared with any other thread anymore at this point.
    pub fn release(self, platform: &dyn Platform) {
        let sprites = (self.base_tiles.into_iter())
            .chain(self.world_scene)
            .chain(self.obstacles.into_sprites());
        for sprite in sprites {
            sprite.release(platform);
        }

        match Arc::into_inner(self.player) {
            Some(player) => release_texture(player.into_texture(), platform),
            None => warn!("Player sprite is still shared, not releasing its texture."),
        }
    }

    pub fn area(&self) -> (i32, i32) {
        self.area
    }

    pub fn base_tiles(&self) -> &[SpriteHandle] {
        &self.base_tiles
    }

    pub fn world_scene(&self) -> &[SpriteHandle] {
        &self.world_scene
    }

    pub fn obstacles(&self) -> &ObstaclePool {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut ObstaclePool {
        &mut self.obstacles
    }

    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use platform::{ErrorKind, Rect};

    use crate::{config::GameConfig, test_platform::TestPlatform};

    use super::{collides, tile_count, ScrollResult, World};

    fn platform() -> TestPlatform {
        let platform = TestPlatform::new(1920, 1080);
        platform.add_default_images();
        platform
    }

    #[test]
    fn tile_count_covers_the_screen_with_one_spare() {
        assert_eq!(6, tile_count(1920, 400));
        assert_eq!(5, tile_count(1600, 400));
        assert_eq!(2, tile_count(100, 400));
        assert_eq!(1, tile_count(1920, 0));
    }

    #[test]
    fn floor_tiles_are_laid_out_left_to_right() {
        let platform = platform();
        let world = World::create(&platform, &GameConfig::default()).unwrap();

        let xs: Vec<i32> = world.base_tiles().iter().map(|t| t.x()).collect();
        assert_eq!(vec![0, 400, 800, 1200, 1600, 2000], xs);
        assert!(world.base_tiles().iter().all(|t| t.y() == 1080 - 120));
        let first = &world.base_tiles()[0];
        assert!(world.base_tiles().iter().all(|t| t.shares_texture_with(first)));
    }

    #[test]
    fn everything_rests_on_the_floor() {
        let platform = platform();
        let world = World::create(&platform, &GameConfig::default()).unwrap();

        assert_eq!(960, world.floor_line());
        assert!(world.world_scene().iter().all(|t| t.y() == 960 - 500));
        assert!(world.obstacles().sprites().all(|o| o.x() == 1920 && o.y() == 960 - 120));
        assert_eq!(Rect::xywh(100, 960 - 300, 262, 300), world.player().placement());
    }

    #[test]
    fn collision_boundaries() {
        let player = Rect::xywh(100, 800, 262, 300);
        let obstacle = |x, y| Rect::xywh(x, y, 80, 90);

        assert!(collides(player, obstacle(300, 900), 100));
        assert!(collides(player, obstacle(101, 900), 100));
        assert!(collides(player, obstacle(361, 900), 100));
        assert!(!collides(player, obstacle(100, 900), 100));
        assert!(!collides(player, obstacle(362, 900), 100));
        assert!(collides(player, obstacle(300, 999), 100));
        assert!(!collides(player, obstacle(300, 1000), 100));
    }

    #[test]
    fn tiles_stay_within_wraparound_bounds() {
        let platform = platform();
        let mut world = World::create(&platform, &GameConfig::default()).unwrap();
        let player = world.player().clone();
        player.set_y(-10_000);

        let floor_span = 400 * world.base_tiles().len() as i32;
        let scene_span = 700 * world.world_scene().len() as i32;
        for _ in 0..5000 {
            assert_eq!(ScrollResult::Scrolled, world.scroll());
            assert!(world
                .base_tiles()
                .iter()
                .all(|t| -400 <= t.x() && t.x() <= floor_span));
            assert!(world
                .world_scene()
                .iter()
                .all(|t| -700 <= t.x() && t.x() <= scene_span));
        }
    }

    #[test]
    fn floor_wraps_with_overlap() {
        let platform = platform();
        let mut world = World::create(&platform, &GameConfig::default()).unwrap();
        world.player().set_y(-10_000);

        for _ in 0..80 {
            world.scroll();
        }
        assert_eq!(5 * 400 - 15, world.base_tiles()[0].x());
        assert_eq!(1600, world.base_tiles()[5].x());
    }

    #[test]
    fn standing_player_hits_the_first_obstacle() {
        let platform = platform();
        let mut world = World::create(&platform, &GameConfig::default()).unwrap();

        let mut frames = 0;
        let hit = loop {
            frames += 1;
            if let ScrollResult::Collided(index) = world.scroll() {
                break index;
            }
            assert!(frames < 1000, "no collision");
        };

        assert_eq!(0, hit);
        assert_eq!(312, frames);
        assert_eq!(360, world.obstacles().sprite(0).x());
        assert!(world.obstacles().sprites().skip(1).all(|o| o.x() == 365));
    }

    #[test]
    fn reset_restores_the_initial_layout() {
        let platform = platform();
        let mut world = World::create(&platform, &GameConfig::default()).unwrap();
        world.player().set_y(-10_000);
        for _ in 0..700 {
            world.scroll();
        }
        assert!(world.obstacles().residual_len() > 0);

        world.reset();

        let xs: Vec<i32> = world.base_tiles().iter().map(|t| t.x()).collect();
        assert_eq!(vec![0, 400, 800, 1200, 1600, 2000], xs);
        assert_eq!(0, world.world_scene()[0].x());
        assert_eq!(0, world.obstacles().residual_len());
        assert!(world.obstacles().sprites().all(|o| o.x() == 1920 && o.y() == 840));
        assert_eq!(Rect::xywh(100, 660, 262, 300), world.player().placement());
        assert_eq!(4, platform.loaded_sprite_count());
    }

    #[test]
    fn failed_load_releases_what_was_loaded() {
        let platform = TestPlatform::new(1920, 1080);
        platform.add_default_images();
        platform.fail_path(&GameConfig::default().assets.player);

        let err = World::create(&platform, &GameConfig::default()).unwrap_err();

        assert_eq!(ErrorKind::ResourceLoad, err.kind());
        assert_eq!(3, platform.loaded_sprite_count());
        assert_eq!(3, platform.freed_sprites().len());
    }

    #[test]
    fn release_frees_each_texture_once() {
        let platform = platform();
        let world = World::create(&platform, &GameConfig::default()).unwrap();
        world.release(&platform);

        let mut freed = platform.freed_sprites();
        freed.sort();
        freed.dedup();
        assert_eq!(4, freed.len());
        assert_eq!(4, platform.freed_sprites().len());
    }
}
