//! Registers the harness's own reference algorithms and engine into the
//! process-wide registry, the "programmatic registration" path design
//! notes §9 calls for so the core can be exercised without any dynamic
//! linkage. Grounded in the naming of the original's test fixture
//! libraries (`always_move_forward_*`, `always_shoot_*`, `do_nothing_*`).

use crate::algorithms::{
    AlwaysMoveForwardAlgorithm, AlwaysShootAlgorithm, DefensiveAlgorithm, DoNothingAlgorithm, OffensiveAlgorithm, Player,
    StandardPlayer, TankAlgorithm, TargetingPlayer,
};
use crate::engine::StandardEngine;
use crate::geometry::{Direction, Point};
use crate::registry;

fn standard_player() -> Box<dyn Player> {
    Box::new(StandardPlayer)
}

fn targeting_player() -> Box<dyn Player> {
    Box::new(TargetingPlayer)
}

fn do_nothing(_player_id: u32, _tank_index: usize, _position: Point, _heading: Direction, _shells: u32) -> Box<dyn TankAlgorithm> {
    Box::new(DoNothingAlgorithm)
}

fn always_shoot(_player_id: u32, _tank_index: usize, _position: Point, _heading: Direction, _shells: u32) -> Box<dyn TankAlgorithm> {
    Box::new(AlwaysShootAlgorithm)
}

fn always_move_forward(
    _player_id: u32,
    _tank_index: usize,
    _position: Point,
    _heading: Direction,
    _shells: u32,
) -> Box<dyn TankAlgorithm> {
    Box::new(AlwaysMoveForwardAlgorithm)
}

fn defensive(_player_id: u32, _tank_index: usize, position: Point, heading: Direction, _shells: u32) -> Box<dyn TankAlgorithm> {
    Box::new(DefensiveAlgorithm::new(position, heading))
}

fn offensive(_player_id: u32, _tank_index: usize, position: Point, heading: Direction, _shells: u32) -> Box<dyn TankAlgorithm> {
    Box::new(OffensiveAlgorithm::new(position, heading))
}

/// Idempotent: safe to call more than once (e.g. once per test binary),
/// since re-registering the same name under the registry's linear lookup
/// just shadows earlier entries with identical factories.
pub fn register_all() {
    registry::register_engine("standard", StandardEngine::factory);
    registry::register_algorithm("do_nothing", standard_player, do_nothing);
    registry::register_algorithm("always_shoot", standard_player, always_shoot);
    registry::register_algorithm("always_move_forward", standard_player, always_move_forward);
    registry::register_algorithm("defensive", standard_player, defensive);
    registry::register_algorithm("offensive", targeting_player, offensive);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_reference_algorithm_by_name() {
        register_all();
        for name in ["do_nothing", "always_shoot", "always_move_forward", "defensive", "offensive"] {
            assert!(registry::find_algorithm(name).is_ok(), "missing {name}");
        }
        assert!(registry::find_engine("standard").is_ok());
    }
}
