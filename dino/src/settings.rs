// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use engine::GameConfig;
use platform_sdl2::WindowOptions;
use serde::Deserialize;
use tracing::debug;

/// The settings file. Every field is optional, a missing section or field
/// means the default.
///
/// Has enum variants for breaking changes in the format of the settings file,
/// but [`read`] always returns the newest variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "settings_file_version", rename_all = "snake_case")]
pub enum Settings {
    V1 {
        #[serde(default)]
        window: WindowSettings,
        #[serde(default)]
        game: GameConfig,
    },
}

impl Default for Settings {
    fn default() -> Self {
        Settings::V1 {
            window: WindowSettings::default(),
            game: GameConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub frame_delay_ms: u64,
    pub keys: KeySettings,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            title: "Crazy Dino".to_string(),
            width: 1920,
            height: 1080,
            fullscreen: true,
            frame_delay_ms: 4,
            keys: KeySettings::default(),
        }
    }
}

impl WindowSettings {
    pub fn to_window_options(&self, windowed: bool) -> WindowOptions {
        WindowOptions {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            fullscreen: self.fullscreen && !windowed,
            frame_delay: Duration::from_millis(self.frame_delay_ms),
            jump_key: self.keys.jump.clone(),
            restart_key: self.keys.restart.clone(),
            quit_key: self.keys.quit.clone(),
        }
    }
}

/// SDL scancode names of the keys bound to each action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeySettings {
    pub jump: String,
    pub restart: String,
    pub quit: String,
}

impl Default for KeySettings {
    fn default() -> Self {
        KeySettings {
            jump: "Up".to_string(),
            restart: "R".to_string(),
            quit: "Q".to_string(),
        }
    }
}

pub fn parse(settings: &str) -> anyhow::Result<Settings> {
    let settings = serde_json::from_str(settings).context("Failed to parse the settings file")?;

    // NOTE: When there's new versions of Settings, convert to the newest here
    // (main assumes it)

    Ok(settings)
}

pub fn read(settings: Option<&Path>) -> anyhow::Result<Settings> {
    match settings {
        Some(path) if path.exists() => {
            debug!("Reading settings from: {}", path.display());
            let settings =
                fs::read_to_string(path).context("Failed to open the settings file")?;
            parse(&settings)
        }
        Some(path) => {
            debug!("{} doesn't exist, using the default settings.", path.display());
            Ok(Settings::default())
        }
        None => Ok(Settings::default()),
    }
}
