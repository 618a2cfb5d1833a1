//! The offensive reference tank algorithm: same danger/shoot priorities as
//! Defensive, then chases a designated target by BFS over the toroidal
//! grid.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::board::CellKind;
use crate::config::BATTLE_INFO_STALE_AFTER;
use crate::geometry::{Direction, Point};

use super::common;
use super::{ActionRequest, BattleInfo, TankAlgorithm};

pub struct OffensiveAlgorithm {
    battle_info: Option<BattleInfo>,
    turns_since_update: u32,
    own_position: Point,
    own_heading: Direction,
    path: Vec<Point>,
    path_target: Option<Point>,
}

impl OffensiveAlgorithm {
    pub fn new(position: Point, heading: Direction) -> Self {
        OffensiveAlgorithm {
            battle_info: None,
            turns_since_update: BATTLE_INFO_STALE_AFTER + 1,
            own_position: position,
            own_heading: heading,
            path: Vec::new(),
            path_target: None,
        }
    }

    fn needs_recompute(&self, info: &BattleInfo, target: Point) -> bool {
        let Some(&front) = self.path.first() else { return true };
        if !common::is_position_safe(info, front) {
            return true;
        }
        if info.step_distance(self.own_position, front) > 1 {
            return true;
        }
        if let Some(prev_target) = self.path_target {
            if info.step_distance(prev_target, target) > 1 {
                return true;
            }
        }
        false
    }

    fn update_path_to_target(&mut self, info: &BattleInfo, target: Point) {
        if self.needs_recompute(info, target) {
            self.path = bfs_path(info, self.own_position, target);
            self.path_target = Some(target);
        }
    }

    fn follow_current_path(&mut self, info: &BattleInfo) -> ActionRequest {
        while self.path.first() == Some(&self.own_position) {
            self.path.remove(0);
        }
        let Some(&front) = self.path.first() else { return ActionRequest::DoNothing };
        let dir = common::direction_between(self.own_position, front, info.board_width, info.board_height);
        if dir == self.own_heading {
            self.path.remove(0);
            ActionRequest::MoveForward
        } else {
            common::rotation_action(self.own_heading, dir)
        }
    }

    fn decide(&mut self) -> ActionRequest {
        if self.turns_since_update > BATTLE_INFO_STALE_AFTER {
            return ActionRequest::GetBattleInfo;
        }
        let info = match self.battle_info.clone() {
            Some(i) => i,
            None => return ActionRequest::GetBattleInfo,
        };
        if common::is_in_danger(&info, self.own_position) {
            return common::best_safe_move(&info, self.own_position, self.own_heading);
        }
        if common::enemy_in_line_of_sight(&info, self.own_position, self.own_heading) {
            return ActionRequest::Shoot;
        }
        let Some(target) = info.target else {
            return common::best_safe_move(&info, self.own_position, self.own_heading);
        };
        if let Some(dir) = common::direction_with_los_to(&info, self.own_position, target) {
            if dir != self.own_heading {
                return common::rotation_action(self.own_heading, dir);
            }
        }
        self.update_path_to_target(&info, target);
        self.follow_current_path(&info)
    }

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

impl TankAlgorithm for OffensiveAlgorithm {
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

/// Breadth-first search over the toroidal grid, avoiding Walls, Mines, and
/// any known tank except at the destination cell itself.
fn bfs_path(info: &BattleInfo, start: Point, target: Point) -> Vec<Point> {
    if start == target {
        return Vec::new();
    }
    let mut visited = HashSet::new();
    let mut came_from: HashMap<Point, Point> = HashMap::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    let mut found = false;

    while let Some(cur) = queue.pop_front() {
        if cur == target {
            found = true;
            break;
        }
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let next = cur.add(dx, dy).wrap(info.board_width, info.board_height);
            if visited.contains(&next) {
                continue;
            }
            let passable = next == target
                || (info.cell_at(next) != CellKind::Wall
                    && info.cell_at(next) != CellKind::Mine
                    && !info.is_tank_at(next));
            if !passable {
                continue;
            }
            visited.insert(next);
            came_from.insert(next, cur);
            queue.push_back(next);
        }
    }

    if !found {
        return Vec::new();
    }
    let mut path = Vec::new();
    let mut cur = target;
    while cur != start {
        path.push(cur);
        cur = came_from[&cur];
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_with(w: i32, h: i32, own: Point, target: Point) -> BattleInfo {
        BattleInfo {
            board_width: w,
            board_height: h,
            cells: vec![CellKind::Empty; (w * h) as usize],
            friendly_tanks: vec![],
            enemy_tanks: vec![target],
            shells: vec![],
            own_position: own,
            target: Some(target),
        }
    }

    #[test]
    fn bfs_finds_direct_path_on_open_board() {
        let info = info_with(10, 10, Point::new(0, 0), Point::new(3, 0));
        let path = bfs_path(&info, Point::new(0, 0), Point::new(3, 0));
        assert_eq!(path.last(), Some(&Point::new(3, 0)));
        assert!(path.len() <= 3);
    }

    #[test]
    fn converges_toward_target_over_repeated_steps() {
        // Off-axis target: never directly in line of sight, so the
        // algorithm must path toward it rather than stand and shoot.
        let own = Point::new(0, 0);
        let target = Point::new(4, 1);
        let info = info_with(10, 10, own, target);
        let start_dist = info.step_distance(own, target);
        let mut algo = OffensiveAlgorithm::new(own, Direction::Right);
        algo.update_battle_info(&info);
        for _ in 0..4 {
            algo.get_action();
        }
        let dist = info.step_distance(algo.own_position, target);
        assert!(dist < start_dist);
    }
}
