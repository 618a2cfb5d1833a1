use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use chrono::Local;
use clap::Parser;

use tank_arena::cli::{Cli, Mode};
use tank_arena::error_collector::ErrorCollector;
use tank_arena::errors::CliError;
use tank_arena::map::{self, BoardInfo};
use tank_arena::match_runner::run_match;
use tank_arena::output;
use tank_arena::registry;
use tank_arena::tournament::{run_comparative, run_competitive};
use tank_arena::{builtins, loader};

fn main() -> ExitCode {
    env_logger::init();
    builtins::register_all();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mode = cli.resolve_mode().map_err(|e| e.to_string())?;
    let errors = Arc::new(Mutex::new(ErrorCollector::new()));
    let num_threads = cli.num_threads();

    let outcome = match mode {
        Mode::Basic { game_map, game_manager, algorithm1, algorithm2 } => {
            run_basic(&game_map, &game_manager, &algorithm1, &algorithm2, cli.verbose, &errors)
        }
        Mode::Comparative { game_map, game_managers_folder, algorithm1, algorithm2 } => {
            run_comparative_mode(&game_map, &game_managers_folder, &algorithm1, &algorithm2, num_threads, &errors)
        }
        Mode::Competitive { game_maps_folder, game_manager, algorithms_folder } => {
            run_competitive_mode(&game_maps_folder, &game_manager, &algorithms_folder, num_threads, &errors)
        }
    };

    if errors.lock().unwrap().has_errors() && !errors.lock().unwrap().save_to_file() {
        log::warn!("could not persist input_errors.txt");
    }

    outcome
}

fn load_map(path: &str, errors: &Arc<Mutex<ErrorCollector>>) -> Result<BoardInfo, String> {
    let info = map::load_board_file(Path::new(path)).map_err(|e| e.to_string())?;
    if !info.warnings.is_empty() {
        errors.lock().unwrap().add_map_warnings(&info.name, &info.warnings);
    }
    Ok(info)
}

fn run_basic(
    game_map: &str,
    game_manager: &str,
    algorithm1: &str,
    algorithm2: &str,
    verbose: bool,
    errors: &Arc<Mutex<ErrorCollector>>,
) -> Result<(), String> {
    let board_info = load_map(game_map, errors)?;
    let (result, logs) =
        run_match(&board_info, game_manager, algorithm1, algorithm2, verbose).map_err(|e| e.to_string())?;

    if verbose {
        let filename = format!(
            "game_{}_vs_{}_{}_{}.txt",
            output::sanitize_filename_component(algorithm1),
            output::sanitize_filename_component(algorithm2),
            output::sanitize_filename_component(&board_info.name),
            Local::now().format("%Y%m%d%H%M%S"),
        );
        if let Err(e) = std::fs::write(&filename, output::render_basic_log(&logs, &result)) {
            log::warn!("could not write verbose log {}: {}", filename, e);
        }
    }

    println!("{}", output::render_basic_log(&logs, &result));
    Ok(())
}

fn load_plugins_from_folder(folder: &str) -> Result<(), String> {
    let files = loader::enumerate_plugin_files(Path::new(folder)).map_err(|e| e.to_string())?;
    for file in files {
        if let Err(e) = unsafe { loader::load_plugin_library(&file) } {
            log::warn!("failed to load plugin {}: {}", file.display(), e);
        }
    }
    Ok(())
}

fn run_comparative_mode(
    game_map: &str,
    game_managers_folder: &str,
    algorithm1: &str,
    algorithm2: &str,
    num_threads: usize,
    errors: &Arc<Mutex<ErrorCollector>>,
) -> Result<(), String> {
    let board_info = load_map(game_map, errors)?;
    load_plugins_from_folder(game_managers_folder)?;
    let engine_names = registry::engine_names();
    if engine_names.len() < 2 {
        return Err(CliError::InsufficientEngines { found: engine_names.len() }.to_string());
    }
    let groups = run_comparative(&board_info, &engine_names, algorithm1, algorithm2, num_threads, errors);
    println!("{}", output::render_comparative(game_map, algorithm1, algorithm2, &groups));
    Ok(())
}

fn run_competitive_mode(
    game_maps_folder: &str,
    game_manager: &str,
    algorithms_folder: &str,
    num_threads: usize,
    errors: &Arc<Mutex<ErrorCollector>>,
) -> Result<(), String> {
    let map_files = map::enumerate_map_files(Path::new(game_maps_folder)).map_err(|e| e.to_string())?;
    let mut boards = Vec::with_capacity(map_files.len());
    for file in &map_files {
        boards.push(load_map(&file.to_string_lossy(), errors)?);
    }

    load_plugins_from_folder(algorithms_folder)?;
    let algorithm_names = registry::algorithm_names();
    if algorithm_names.len() < 2 {
        return Err(CliError::InsufficientAlgorithms { found: algorithm_names.len() }.to_string());
    }

    let standings = run_competitive(&boards, &algorithm_names, game_manager, num_threads, errors);
    println!("{}", output::render_competitive(game_maps_folder, game_manager, &standings));
    Ok(())
}
