// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use enum_map::{Enum, EnumMap};
use platform::{ActionCategory, Button, Event, Platform};

/// The things the player can make happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum GameAction {
    Jump,
    Restart,
    Quit,
}

impl GameAction {
    fn category(self) -> ActionCategory {
        match self {
            GameAction::Jump => ActionCategory::Jump,
            GameAction::Restart => ActionCategory::Restart,
            GameAction::Quit => ActionCategory::Quit,
        }
    }
}

/// Which button triggers which [`GameAction`].
#[derive(Debug, Clone)]
pub struct InputBindings {
    buttons: EnumMap<GameAction, Option<Button>>,
}

impl InputBindings {
    /// Binds every action to the platform's default button for it.
    pub fn from_platform(platform: &dyn Platform) -> InputBindings {
        InputBindings {
            buttons: EnumMap::from_fn(|action: GameAction| {
                platform.default_button_for_action(action.category())
            }),
        }
    }

    pub fn button(&self, action: GameAction) -> Option<Button> {
        self.buttons[action]
    }

    pub fn rebind(&mut self, action: GameAction, button: Option<Button>) {
        self.buttons[action] = button;
    }

    /// Maps an event to the action it triggers. Closing the window or the
    /// process being asked to quit always means [`GameAction::Quit`]. Presses
    /// of unbound buttons map to nothing.
    pub fn action_for_event(&self, event: Event) -> Option<GameAction> {
        match event {
            Event::ProcessQuit | Event::WindowClose => Some(GameAction::Quit),
            Event::DigitalInputPressed(button) => self
                .buttons
                .iter()
                .find(|(_, bound)| **bound == Some(button))
                .map(|(action, _)| action),
        }
    }
}
