// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::{
    cell::{Cell, RefCell},
    time::Duration,
};
use std::collections::{HashMap, HashSet, VecDeque};

use platform::{
    ActionCategory, Button, EffectId, EngineError, Event, Instant, LoadedSprite, Platform, Rect,
    SpriteRef,
};

use crate::config::AssetPaths;

pub const JUMP_BUTTON: Button = Button::new(1);
pub const RESTART_BUTTON: Button = Button::new(2);
pub const QUIT_BUTTON: Button = Button::new(3);

/// One recorded [`Platform::draw_sprite`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub sprite: SpriteRef,
    pub clip: Rect,
    pub placement: Rect,
}

/// A deterministic, in-memory [`Platform`] for tests.
///
/// Images have to be registered with [`TestPlatform::add_image`] to be
/// loadable. Audio files load unless their path is marked with
/// [`TestPlatform::fail_path`]. Time only moves with
/// [`TestPlatform::set_elapsed_millis`], and the random numbers are the ones
/// queued with [`TestPlatform::push_random`] (1 once the queue runs out).
pub struct TestPlatform {
    area: (i32, i32),
    images: RefCell<HashMap<String, (i32, i32)>>,
    failing_paths: RefCell<HashSet<String>>,
    next_sprite: Cell<u64>,
    loaded_sprites: RefCell<Vec<SpriteRef>>,
    freed_sprites: RefCell<Vec<SpriteRef>>,
    frame_draws: RefCell<Vec<DrawCall>>,
    clears: Cell<u32>,
    commits: Cell<u32>,
    fades: Cell<u32>,
    loop_track: RefCell<Option<String>>,
    loop_playing: Cell<bool>,
    effects: RefCell<HashMap<EffectId, String>>,
    played_effects: RefCell<Vec<EffectId>>,
    events: RefCell<VecDeque<Event>>,
    random: RefCell<VecDeque<u32>>,
    elapsed: Cell<Duration>,
}

impl TestPlatform {
    pub fn new(width: i32, height: i32) -> TestPlatform {
        TestPlatform {
            area: (width, height),
            images: RefCell::new(HashMap::new()),
            failing_paths: RefCell::new(HashSet::new()),
            next_sprite: Cell::new(1),
            loaded_sprites: RefCell::new(Vec::new()),
            freed_sprites: RefCell::new(Vec::new()),
            frame_draws: RefCell::new(Vec::new()),
            clears: Cell::new(0),
            commits: Cell::new(0),
            fades: Cell::new(0),
            loop_track: RefCell::new(None),
            loop_playing: Cell::new(false),
            effects: RefCell::new(HashMap::new()),
            played_effects: RefCell::new(Vec::new()),
            events: RefCell::new(VecDeque::new()),
            random: RefCell::new(VecDeque::new()),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub fn add_image(&self, path: &str, width: i32, height: i32) {
        self.images
            .borrow_mut()
            .insert(path.to_string(), (width, height));
    }

    /// Registers the default asset images: a 400x120 floor tile, a 700x500
    /// background, a 80x120 obstacle and a player sheet of three 262x300
    /// frames.
    pub fn add_default_images(&self) {
        let assets = AssetPaths::default();
        self.add_image(&assets.floor_tile, 400, 120);
        self.add_image(&assets.world_scene, 700, 500);
        self.add_image(&assets.obstacle, 80, 120);
        self.add_image(&assets.player, 3 * 262, 300);
    }

    /// Makes loading anything from `path` fail.
    pub fn fail_path(&self, path: &str) {
        self.failing_paths.borrow_mut().insert(path.to_string());
    }

    pub fn set_elapsed_millis(&self, millis: u64) {
        self.elapsed.set(Duration::from_millis(millis));
    }

    pub fn push_event(&self, event: Event) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn push_random(&self, value: u32) {
        self.random.borrow_mut().push_back(value);
    }

    pub fn loaded_sprite_count(&self) -> usize {
        self.loaded_sprites.borrow().len()
    }

    pub fn freed_sprites(&self) -> Vec<SpriteRef> {
        self.freed_sprites.borrow().clone()
    }

    /// The draw calls made since the last clear.
    pub fn frame_draws(&self) -> Vec<DrawCall> {
        self.frame_draws.borrow().clone()
    }

    pub fn clear_count(&self) -> u32 {
        self.clears.get()
    }

    pub fn commit_count(&self) -> u32 {
        self.commits.get()
    }

    pub fn fade_count(&self) -> u32 {
        self.fades.get()
    }

    pub fn loop_track(&self) -> Option<String> {
        self.loop_track.borrow().clone()
    }

    pub fn is_loop_playing(&self) -> bool {
        self.loop_playing.get()
    }

    pub fn played_effects(&self) -> Vec<EffectId> {
        self.played_effects.borrow().clone()
    }

    fn check_path(&self, path: &str) -> Result<(), EngineError> {
        if self.failing_paths.borrow().contains(path) {
            return Err(EngineError::resource_load(format!("{path} is broken")));
        }
        Ok(())
    }
}

impl Platform for TestPlatform {
    fn draw_area(&self) -> (i32, i32) {
        self.area
    }

    fn load_sprite(&self, path: &str) -> Result<LoadedSprite, EngineError> {
        self.check_path(path)?;
        let Some(&(width, height)) = self.images.borrow().get(path) else {
            return Err(EngineError::resource_load(format!("{path} not found")));
        };
        let sprite = SpriteRef::new(self.next_sprite.get());
        self.next_sprite.set(sprite.inner() + 1);
        self.loaded_sprites.borrow_mut().push(sprite);
        Ok(LoadedSprite {
            sprite,
            width,
            height,
        })
    }

    fn free_sprite(&self, sprite: SpriteRef) {
        assert!(
            self.loaded_sprites.borrow().contains(&sprite),
            "freed a sprite that was never loaded: {sprite:?}",
        );
        self.freed_sprites.borrow_mut().push(sprite);
    }

    fn clear(&self) -> Result<(), EngineError> {
        self.clears.set(self.clears.get() + 1);
        self.frame_draws.borrow_mut().clear();
        Ok(())
    }

    fn draw_sprite(&self, sprite: SpriteRef, clip: Rect, placement: Rect) -> Result<(), EngineError> {
        if self.freed_sprites.borrow().contains(&sprite) {
            return Err(EngineError::backend_call(format!(
                "drew {sprite:?} after freeing it"
            )));
        }
        self.frame_draws.borrow_mut().push(DrawCall {
            sprite,
            clip,
            placement,
        });
        Ok(())
    }

    fn commit(&self) {
        self.commits.set(self.commits.get() + 1);
    }

    fn fade_transition(&self) -> Result<(), EngineError> {
        self.fades.set(self.fades.get() + 1);
        Ok(())
    }

    fn load_loop_track(&self, path: &str) -> Result<(), EngineError> {
        self.check_path(path)?;
        self.loop_playing.set(false);
        *self.loop_track.borrow_mut() = Some(path.to_string());
        Ok(())
    }

    fn play_loop(&self) -> Result<(), EngineError> {
        if self.loop_track.borrow().is_some() {
            self.loop_playing.set(true);
        }
        Ok(())
    }

    fn pause_loop(&self) {
        self.loop_playing.set(false);
    }

    fn load_effect(&self, id: EffectId, path: &str) -> Result<(), EngineError> {
        self.check_path(path)?;
        self.effects.borrow_mut().insert(id, path.to_string());
        Ok(())
    }

    fn play_effect(&self, id: EffectId) {
        if self.effects.borrow().contains_key(&id) {
            self.played_effects.borrow_mut().push(id);
        }
    }

    fn poll_event(&self) -> Option<Event> {
        self.events.borrow_mut().pop_front()
    }

    fn default_button_for_action(&self, action: ActionCategory) -> Option<Button> {
        Some(match action {
            ActionCategory::Jump => JUMP_BUTTON,
            ActionCategory::Restart => RESTART_BUTTON,
            ActionCategory::Quit => QUIT_BUTTON,
        })
    }

    fn now(&self) -> Instant {
        Instant::reference() + self.elapsed.get()
    }

    fn random_u32(&self) -> u32 {
        self.random.borrow_mut().pop_front().unwrap_or(1)
    }
}
