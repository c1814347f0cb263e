// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

mod cli;
mod settings;

use std::process::ExitCode;

use anyhow::Context;
use engine::Platformer;
use platform_sdl2::Sdl2Platform;
use tracing::{error, info};

use crate::settings::Settings;

fn main() -> ExitCode {
    let options = cli::options().run();

    tracing_subscriber::fmt()
        .with_max_level(options.verbosity_level)
        .init();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &cli::Options) -> anyhow::Result<()> {
    let Settings::V1 { window, game } = settings::read(options.settings_path.as_deref())?;

    let platform = Sdl2Platform::new(&window.to_window_options(options.windowed))
        .context("Failed to initialize SDL")?;
    let mut platformer =
        Platformer::new(&platform, game).context("Failed to load the game assets")?;

    info!("Starting the game.");
    let result = platformer.run(&platform);
    platformer.shutdown(&platform);

    result.context("The game loop failed")
}
