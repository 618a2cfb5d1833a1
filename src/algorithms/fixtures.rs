//! Trivial reference algorithms used as scenario fixtures and smoke-test
//! opponents.

use super::{ActionRequest, BattleInfo, TankAlgorithm};

#[derive(Default)]
pub struct DoNothingAlgorithm;

impl TankAlgorithm for DoNothingAlgorithm {
    fn get_action(&mut self) -> ActionRequest {
        ActionRequest::DoNothing
    }

    fn update_battle_info(&mut self, _info: &BattleInfo) {}
}

#[derive(Default)]
pub struct AlwaysShootAlgorithm;

impl TankAlgorithm for AlwaysShootAlgorithm {
    fn get_action(&mut self) -> ActionRequest {
        ActionRequest::Shoot
    }

    fn update_battle_info(&mut self, _info: &BattleInfo) {}
}

#[derive(Default)]
pub struct AlwaysMoveForwardAlgorithm;

impl TankAlgorithm for AlwaysMoveForwardAlgorithm {
    fn get_action(&mut self) -> ActionRequest {
        ActionRequest::MoveForward
    }

    fn update_battle_info(&mut self, _info: &BattleInfo) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn do_nothing_never_acts() {
        let mut algo = DoNothingAlgorithm;
        assert_eq!(algo.get_action(), ActionRequest::DoNothing);
    }

    #[test]
    fn always_shoot_ignores_cooldown_state() {
        let mut algo = AlwaysShootAlgorithm;
        assert_eq!(algo.get_action(), ActionRequest::Shoot);
        assert_eq!(algo.get_action(), ActionRequest::Shoot);
    }
}
