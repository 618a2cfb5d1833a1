//! `clap`-derived CLI argument parsing and mode selection (spec §6).
//!
//! The flag contract is `key=value` long options, matching the original's
//! argv surface exactly; mode is detected by which keys are present, not
//! by a subcommand, to keep the documented exit-code/usage contract.

use clap::Parser;

use crate::config::default_num_threads;
use crate::errors::CliError;

#[derive(Parser, Debug)]
#[command(name = "tank_arena", about = "Deterministic toroidal tank-combat tournament harness")]
pub struct Cli {
    #[arg(long)]
    pub game_map: Option<String>,
    #[arg(long)]
    pub game_manager: Option<String>,
    #[arg(long)]
    pub algorithm1: Option<String>,
    #[arg(long)]
    pub algorithm2: Option<String>,
    #[arg(long)]
    pub game_managers_folder: Option<String>,
    #[arg(long)]
    pub game_maps_folder: Option<String>,
    #[arg(long)]
    pub algorithms_folder: Option<String>,
    #[arg(long)]
    pub num_threads: Option<usize>,
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum Mode {
    Basic { game_map: String, game_manager: String, algorithm1: String, algorithm2: String },
    Comparative { game_map: String, game_managers_folder: String, algorithm1: String, algorithm2: String },
    Competitive { game_maps_folder: String, game_manager: String, algorithms_folder: String },
}

impl Cli {
    pub fn num_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(default_num_threads)
    }

    /// Select a mode from which keys were supplied. Basic mode is chosen
    /// when a single `game_manager` is present; Comparative when a folder
    /// of engines is present instead; Competitive when maps/algorithms
    /// folders are present. Any other combination is a usage error.
    pub fn resolve_mode(&self) -> Result<Mode, CliError> {
        let usage = || {
            CliError::Usage(
                "usage: tank_arena game_map=<file> game_manager=<plugin> algorithm1=<plugin> algorithm2=<plugin> [verbose] \
                 | game_map=<file> game_managers_folder=<dir> algorithm1=<plugin> algorithm2=<plugin> [num_threads=<n>] [verbose] \
                 | game_maps_folder=<dir> game_manager=<plugin> algorithms_folder=<dir> [num_threads=<n>] [verbose]"
                    .to_string(),
            )
        };

        match (
            &self.game_map,
            &self.game_manager,
            &self.algorithm1,
            &self.algorithm2,
            &self.game_managers_folder,
            &self.game_maps_folder,
            &self.algorithms_folder,
        ) {
            (Some(map), Some(manager), Some(a1), Some(a2), None, None, None) => Ok(Mode::Basic {
                game_map: map.clone(),
                game_manager: manager.clone(),
                algorithm1: a1.clone(),
                algorithm2: a2.clone(),
            }),
            (Some(map), None, Some(a1), Some(a2), Some(managers_folder), None, None) => Ok(Mode::Comparative {
                game_map: map.clone(),
                game_managers_folder: managers_folder.clone(),
                algorithm1: a1.clone(),
                algorithm2: a2.clone(),
            }),
            (None, Some(manager), None, None, None, Some(maps_folder), Some(algos_folder)) => Ok(Mode::Competitive {
                game_maps_folder: maps_folder.clone(),
                game_manager: manager.clone(),
                algorithms_folder: algos_folder.clone(),
            }),
            _ => Err(usage()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(fields: &[(&str, &str)]) -> Cli {
        let mut args = vec!["tank_arena".to_string()];
        for (k, v) in fields {
            args.push(format!("--{}={}", k, v));
        }
        Cli::parse_from(args)
    }

    #[test]
    fn basic_mode_detected_from_single_game_manager() {
        let c = cli(&[
            ("game_map", "arena.txt"),
            ("game_manager", "engine.so"),
            ("algorithm1", "defensive.so"),
            ("algorithm2", "offensive.so"),
        ]);
        assert!(matches!(c.resolve_mode(), Ok(Mode::Basic { .. })));
    }

    #[test]
    fn comparative_mode_detected_from_engines_folder() {
        let c = cli(&[
            ("game_map", "arena.txt"),
            ("game_managers_folder", "engines/"),
            ("algorithm1", "defensive.so"),
            ("algorithm2", "offensive.so"),
        ]);
        assert!(matches!(c.resolve_mode(), Ok(Mode::Comparative { .. })));
    }

    #[test]
    fn competitive_mode_detected_from_maps_and_algorithms_folders() {
        let c = cli(&[
            ("game_maps_folder", "maps/"),
            ("game_manager", "engine.so"),
            ("algorithms_folder", "algos/"),
        ]);
        assert!(matches!(c.resolve_mode(), Ok(Mode::Competitive { .. })));
    }

    #[test]
    fn ambiguous_combination_is_a_usage_error() {
        let c = cli(&[("game_map", "arena.txt")]);
        assert!(matches!(c.resolve_mode(), Err(CliError::Usage(_))));
    }

    #[test]
    fn default_num_threads_falls_back_to_cpu_count() {
        let c = cli(&[("game_map", "arena.txt")]);
        assert!(c.num_threads() >= 1);
    }
}
