// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The game session: owns the world and the auxiliary threads, and runs the
//! main loop.

use std::{
    ops::ControlFlow,
    sync::Arc,
    thread::{self, JoinHandle},
};

use platform::{EffectId, EngineError, Instant, Platform};
use tracing::{debug, error, info, trace};

use crate::{
    config::GameConfig,
    input::{GameAction, InputBindings},
    obstacles::SpawnStatus,
    player::{run_animation, run_jump, SessionFlags},
    world::{ScrollResult, World},
};

/// The effect id the jump sound is loaded as.
pub const JUMP_EFFECT: EffectId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// The world scrolls and the player can jump.
    Running,
    /// The player hit an obstacle. Everything stands still until a restart.
    GameOver,
    /// The player quit. The loop has exited or is about to.
    Stopped,
}

/// Handles of the jump and animation threads, joined before the session lets
/// go of the world.
struct AuxThreads {
    flags: Arc<SessionFlags>,
    animation: Option<JoinHandle<()>>,
    jump: Option<JoinHandle<()>>,
}

impl AuxThreads {
    fn join_jump(&mut self) {
        if let Some(jump) = self.jump.take() {
            if jump.join().is_err() {
                error!("The jump thread panicked.");
            }
        }
    }

    /// Stops the session and waits for both threads to exit. An in-flight
    /// jump sees the game-over flag at its next step and returns.
    fn stop_and_join(&mut self) {
        self.flags.stop();
        self.flags.set_game_over(true);
        self.join_jump();
        if let Some(animation) = self.animation.take() {
            if animation.join().is_err() {
                error!("The animation thread panicked.");
            }
        }
    }
}

impl Drop for AuxThreads {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// One play session of the endless runner.
pub struct Platformer {
    world: World,
    bindings: InputBindings,
    last_spawn: Instant,
    threads: AuxThreads,
}

impl Platformer {
    /// Loads every asset and builds the world, and starts the animation
    /// thread if the player sprite has more than one frame.
    ///
    /// Nothing is left loaded if this fails.
    pub fn new(platform: &dyn Platform, config: GameConfig) -> Result<Platformer, EngineError> {
        let world = World::create(platform, &config)?;

        let audio = platform
            .load_loop_track(&config.assets.loop_track)
            .and_then(|()| platform.load_effect(JUMP_EFFECT, &config.assets.jump_effect));
        if let Err(err) = audio {
            world.release(platform);
            return Err(err);
        }

        let flags = Arc::new(SessionFlags::new());
        let animation = if world.player().is_animated() {
            let player = world.player().clone();
            let flags = flags.clone();
            let config = config.player.clone();
            let spawned = thread::Builder::new()
                .name("animation".to_string())
                .spawn(move || run_animation(player, flags, config));
            match spawned {
                Ok(handle) => Some(handle),
                Err(err) => {
                    world.release(platform);
                    return Err(EngineError::backend_call(format!(
                        "could not spawn the animation thread: {err}"
                    )));
                }
            }
        } else {
            None
        };

        info!("Session created.");
        Ok(Platformer {
            world,
            bindings: InputBindings::from_platform(platform),
            last_spawn: platform.now(),
            threads: AuxThreads {
                flags,
                animation,
                jump: None,
            },
        })
    }

    pub fn state(&self) -> GameState {
        let flags = &self.threads.flags;
        if !flags.is_running() {
            GameState::Stopped
        } else if flags.is_game_over() {
            GameState::GameOver
        } else {
            GameState::Running
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Starts the music and runs frames until the player quits.
    pub fn run(&mut self, platform: &dyn Platform) -> Result<(), EngineError> {
        platform.play_loop()?;
        while self.run_frame(platform)?.is_continue() {}
        info!("Main loop exited.");
        Ok(())
    }

    /// Handles at most one input event, moves the world forward if the game
    /// isn't over, and draws the frame.
    pub fn run_frame(&mut self, platform: &dyn Platform) -> Result<ControlFlow<()>, EngineError> {
        if let Some(event) = platform.poll_event() {
            match self.bindings.action_for_event(event) {
                Some(action) => self.handle_action(action, platform)?,
                None => trace!("Ignored {event:?}."),
            }
        }

        platform.clear()?;

        if self.state() == GameState::Running {
            match self.world.scroll() {
                ScrollResult::Collided(index) => {
                    self.threads.flags.set_game_over(true);
                    platform.pause_loop();
                    info!("Game over: the player hit obstacle {index}.");
                }
                ScrollResult::Scrolled => self.respawn_obstacle(platform),
            }
        }

        self.world.draw(platform)?;
        platform.commit();

        if self.state() == GameState::Stopped {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }

    fn handle_action(
        &mut self,
        action: GameAction,
        platform: &dyn Platform,
    ) -> Result<(), EngineError> {
        match (action, self.state()) {
            (GameAction::Quit, _) => {
                info!("Quitting.");
                self.threads.flags.stop();
            }
            (GameAction::Restart, GameState::GameOver) => {
                platform.fade_transition()?;
                self.reload_world()?;
                platform.play_loop()?;
            }
            (GameAction::Jump, GameState::Running) => self.jump(platform)?,
            (action, state) => trace!("Ignored {action:?} while {state:?}."),
        }
        Ok(())
    }

    fn jump(&mut self, platform: &dyn Platform) -> Result<(), EngineError> {
        let Some(guard) = self.world.player().try_begin_jump() else {
            trace!("Already jumping.");
            return Ok(());
        };
        // The previous jump released the guard, so it's about to exit.
        self.threads.join_jump();

        let flags = self.threads.flags.clone();
        let rest_y = self.world.player_rest_y();
        let config = self.world.config().jump.clone();
        let handle = thread::Builder::new()
            .name("jump".to_string())
            .spawn(move || run_jump(guard, flags, rest_y, config))
            .map_err(|err| {
                EngineError::backend_call(format!("could not spawn the jump thread: {err}"))
            })?;
        self.threads.jump = Some(handle);

        platform.play_effect(JUMP_EFFECT);
        Ok(())
    }

    fn respawn_obstacle(&mut self, platform: &dyn Platform) {
        let spawn_x = self.world.area().0;
        let spawn = self.world.config().spawn.clone();
        let status = self.world.obstacles_mut().try_respawn(
            platform.now(),
            &mut self.last_spawn,
            &spawn,
            spawn_x,
            || platform.random_u32(),
        );
        if let SpawnStatus::Spawned(index) = status {
            trace!("Obstacle {index} back on the conveyor.");
        }
    }

    /// Puts the world back in its initial layout and resumes the game.
    ///
    /// Only allowed while the game is over. Waits for an in-flight jump to
    /// exit before moving the player.
    pub fn reload_world(&mut self) -> Result<(), EngineError> {
        if self.state() != GameState::GameOver {
            return Err(EngineError::precondition(
                "the world can only be reloaded after a game over",
            ));
        }

        self.threads.join_jump();
        self.world.reset();
        self.threads.flags.set_game_over(false);
        info!("World reloaded.");
        Ok(())
    }

    /// Stops the session, waits for the auxiliary threads to exit, and
    /// releases every texture through the platform.
    pub fn shutdown(self, platform: &dyn Platform) {
        let Platformer {
            world, mut threads, ..
        } = self;
        threads.stop_and_join();
        drop(threads);
        debug!("Auxiliary threads joined, releasing the world.");
        world.release(platform);
        info!("Session shut down.");
    }
}
