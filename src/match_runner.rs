//! Wires a loaded map, an engine factory, and two algorithm factories into
//! one playable match (C7).

use crate::board::Board;
use crate::engine::{Engine, GameResult, StepLog};
use crate::entities::Tank;
use crate::errors::PluginError;
use crate::geometry::Direction;
use crate::map::BoardInfo;
use crate::registry;

/// Run one game on `board_info` using the named engine and the two named
/// algorithms, one per player. Each tank's algorithm instance is built
/// fresh from the matching player's factory via `tank_index`, the spawn's
/// position in scan order among that player's own tanks.
pub fn run_match(
    board_info: &BoardInfo,
    engine_name: &str,
    algorithm1_name: &str,
    algorithm2_name: &str,
    verbose: bool,
) -> Result<(GameResult, Vec<StepLog>), PluginError> {
    let engine_entry = registry::find_engine(engine_name)?;
    let algo1 = registry::find_algorithm(algorithm1_name)?;
    let algo2 = registry::find_algorithm(algorithm2_name)?;

    let board = board_info.board.deep_clone();

    let mut per_player_tank_count = [0usize; 2];
    let mut tanks = Vec::with_capacity(board_info.spawns.len());
    let mut algorithms = Vec::with_capacity(board_info.spawns.len());
    for spawn in &board_info.spawns {
        let heading = initial_heading(spawn.player_id);
        tanks.push(Tank::new(spawn.player_id, spawn.position, heading, board_info.num_shells));
        let entry = if spawn.player_id == 1 { &algo1 } else { &algo2 };
        let slot = if spawn.player_id == 1 { 0 } else { 1 };
        let tank_index = per_player_tank_count[slot];
        per_player_tank_count[slot] += 1;
        algorithms.push((entry.algorithm_factory)(spawn.player_id, tank_index, spawn.position, heading, board_info.num_shells));
    }

    let players: Vec<Box<dyn crate::algorithms::Player>> = vec![(algo1.player_factory)(), (algo2.player_factory)()];

    let engine: Box<dyn Engine> = (engine_entry.factory)(verbose);
    Ok(engine.run(board, tanks, board_info.max_steps, &players, algorithms))
}

/// Each player's tanks spawn facing a fixed default heading: player 1
/// faces left, player 2 (and any further player) faces right.
fn initial_heading(player_id: u32) -> Direction {
    if player_id == 1 {
        Direction::Left
    } else {
        Direction::Right
    }
}
