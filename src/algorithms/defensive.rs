//! The defensive reference tank algorithm: avoid danger, shoot when
//! aligned, otherwise take the best safe move.

use crate::config::BATTLE_INFO_STALE_AFTER;
use crate::geometry::{Direction, Point};

use super::common;
use super::{ActionRequest, BattleInfo, TankAlgorithm};

pub struct DefensiveAlgorithm {
    battle_info: Option<BattleInfo>,
    turns_since_update: u32,
    own_position: Point,
    own_heading: Direction,
}

impl DefensiveAlgorithm {
    pub fn new(position: Point, heading: Direction) -> Self {
        DefensiveAlgorithm {
            battle_info: None,
            // Forces a GetBattleInfo request on the first call.
            turns_since_update: BATTLE_INFO_STALE_AFTER + 1,
            own_position: position,
            own_heading: heading,
        }
    }

    fn decide(&self) -> ActionRequest {
        if self.turns_since_update > BATTLE_INFO_STALE_AFTER {
            return ActionRequest::GetBattleInfo;
        }
        let info = match &self.battle_info {
            Some(i) => i,
            None => return ActionRequest::GetBattleInfo,
        };
        if common::is_in_danger(info, self.own_position) {
            return common::best_safe_move(info, self.own_position, self.own_heading);
        }
        if common::enemy_in_line_of_sight(info, self.own_position, self.own_heading) {
            return ActionRequest::Shoot;
        }
        common::best_safe_move(info, self.own_position, self.own_heading)
    }

    /// Optimistic self-model update: assume the requested action executes
    /// as planned. A periodic `GetBattleInfo` refresh corrects any drift
    /// from ignored/blocked moves.
    fn apply_self_model(&mut self, action: ActionRequest) {
        let (w, h) = match &self.battle_info {
            Some(i) => (i.board_width, i.board_height),
            None => return,
        };
        match action {
            ActionRequest::MoveForward => {
                let (dx, dy) = self.own_heading.delta();
                self.own_position = self.own_position.add(dx, dy).wrap(w, h);
            }
            ActionRequest::RotateLeft45 => self.own_heading = self.own_heading.rotate_left_45(),
            ActionRequest::RotateRight45 => self.own_heading = self.own_heading.rotate_right_45(),
            ActionRequest::RotateLeft90 => self.own_heading = self.own_heading.rotate_left_90(),
            ActionRequest::RotateRight90 => self.own_heading = self.own_heading.rotate_right_90(),
            _ => {}
        }
    }
}

impl TankAlgorithm for DefensiveAlgorithm {
    fn get_action(&mut self) -> ActionRequest {
        let action = self.decide();
        self.turns_since_update += 1;
        self.apply_self_model(action);
        action
    }

    fn update_battle_info(&mut self, info: &BattleInfo) {
        self.own_position = info.own_position;
        self.battle_info = Some(info.clone());
        self.turns_since_update = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellKind;

    fn info_with(w: i32, h: i32, own: Point, enemies: Vec<Point>, shells: Vec<Point>) -> BattleInfo {
        BattleInfo {
            board_width: w,
            board_height: h,
            cells: vec![CellKind::Empty; (w * h) as usize],
            friendly_tanks: vec![],
            enemy_tanks: enemies,
            shells,
            own_position: own,
            target: None,
        }
    }

    #[test]
    fn requests_refresh_before_any_info() {
        let mut algo = DefensiveAlgorithm::new(Point::new(0, 0), Direction::Right);
        assert_eq!(algo.get_action(), ActionRequest::GetBattleInfo);
    }

    #[test]
    fn shoots_enemy_on_heading() {
        let own = Point::new(0, 5);
        let info = info_with(10, 10, own, vec![Point::new(3, 5)], vec![]);
        let mut algo = DefensiveAlgorithm::new(own, Direction::Right);
        algo.update_battle_info(&info);
        assert_eq!(algo.get_action(), ActionRequest::Shoot);
    }

    #[test]
    fn evades_when_in_danger() {
        let own = Point::new(5, 5);
        let info = info_with(10, 10, own, vec![], vec![Point::new(2, 5)]);
        let mut algo = DefensiveAlgorithm::new(own, Direction::Right);
        algo.update_battle_info(&info);
        assert_ne!(algo.get_action(), ActionRequest::Shoot);
    }

    #[test]
    fn requests_refresh_after_three_stale_steps() {
        let own = Point::new(5, 5);
        let info = info_with(10, 10, own, vec![], vec![]);
        let mut algo = DefensiveAlgorithm::new(own, Direction::Right);
        algo.update_battle_info(&info);
        for _ in 0..BATTLE_INFO_STALE_AFTER {
            algo.get_action();
        }
        assert_eq!(algo.get_action(), ActionRequest::GetBattleInfo);
    }
}
