// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

/// An input event sent by the platform to the game for handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The process was asked to terminate, e.g. by the OS.
    ProcessQuit,
    /// The game window was closed.
    WindowClose,
    /// Emitted when a digital input (a button, or a key, but not a thumbstick)
    /// is pressed down. Not emitted for key repeats.
    DigitalInputPressed(Button),
}

/// A button or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Button(u64);

impl Button {
    /// Creates a new [`Button`]. Should only be created in the platform
    /// implementation, which also knows how the inner value is going to be
    /// used.
    pub const fn new(id: u64) -> Button {
        Button(id)
    }

    /// Returns the inner value passed into [`Button::new`]. Generally only
    /// relevant to the platform implementation.
    pub const fn inner(self) -> u64 {
        self.0
    }
}

/// Action categories for which the platform provides default buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    /// Make the player jump.
    Jump,
    /// Start over after the game has ended.
    Restart,
    /// Exit the game.
    Quit,
}
