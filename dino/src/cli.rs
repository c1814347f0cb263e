// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use bpaf::{batteries::verbose_by_slice, construct, long, OptionParser, Parser};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Options {
    pub verbosity_level: LevelFilter,
    pub settings_path: Option<PathBuf>,
    pub windowed: bool,
}

pub fn options() -> OptionParser<Options> {
    let verbosity_level = verbose_by_slice(
        3,
        [
            LevelFilter::OFF,
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ],
    );

    let settings_path = long("settings")
        .help("Reads window and game settings from this JSON file")
        .argument::<PathBuf>("FILE")
        .complete_shell(bpaf::ShellComp::File {
            mask: Some("*.json"),
        })
        .optional();

    let windowed = long("windowed")
        .help("Opens a window instead of going fullscreen")
        .switch();

    construct!(Options {
        verbosity_level,
        settings_path,
        windowed,
    })
    .to_options()
    .descr("Crazy Dino, an endless runner. Jump over the obstacles!")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tracing::level_filters::LevelFilter;

    use super::options;

    #[test]
    fn check_bpaf_invariants() {
        options().check_invariants(true);
    }

    #[test]
    fn defaults_to_info_and_fullscreen() {
        let no_args: &[&str] = &[];
        let options = options().run_inner(no_args).unwrap();
        assert_eq!(LevelFilter::INFO, options.verbosity_level);
        assert_eq!(None, options.settings_path);
        assert!(!options.windowed);
    }

    #[test]
    fn flags_are_parsed() {
        let args: &[&str] = &["-vv", "--settings", "dino.json", "--windowed"];
        let options = options().run_inner(args).unwrap();
        assert_eq!(LevelFilter::TRACE, options.verbosity_level);
        assert_eq!(Some(PathBuf::from("dino.json")), options.settings_path);
        assert!(options.windowed);
    }
}
