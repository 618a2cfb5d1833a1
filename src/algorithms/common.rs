//! Shared line-of-sight, danger, and safe-move helpers used by both
//! reference algorithms.

use crate::board::CellKind;
use crate::geometry::{Direction, Point};

use super::{ActionRequest, BattleInfo};

/// Does a shell sitting at `shell_pos` threaten `position` within three
/// steps along a straight line? Battle info carries shell positions only
/// (no heading), so any of the eight directions projected from the shell
/// counts as a threat.
fn shell_threatens(info: &BattleInfo, shell_pos: Point, position: Point) -> bool {
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        let mut p = shell_pos;
        for _ in 0..crate::config::SHELL_DANGER_RADIUS {
            p = p.add(dx, dy).wrap(info.board_width, info.board_height);
            if p == position {
                return true;
            }
        }
    }
    false
}

pub fn is_in_danger(info: &BattleInfo, position: Point) -> bool {
    info.shells.iter().any(|&s| shell_threatens(info, s, position))
}

/// Non-Wall, non-Mine, tank-free, and not currently threatened.
pub fn is_position_safe(info: &BattleInfo, position: Point) -> bool {
    if info.cell_at(position) != CellKind::Empty {
        return false;
    }
    if info.is_tank_at(position) {
        return false;
    }
    !is_in_danger(info, position)
}

/// Walk from `from` in direction `dir`, stopping at the first Wall or
/// tank. Returns `true` if an enemy tank is the first thing hit.
pub fn enemy_in_line_of_sight(info: &BattleInfo, from: Point, dir: Direction) -> bool {
    let (dx, dy) = dir.delta();
    let max_steps = (info.board_width + info.board_height) as usize;
    let mut p = from;
    for _ in 0..max_steps {
        p = p.add(dx, dy).wrap(info.board_width, info.board_height);
        if info.cell_at(p) == CellKind::Wall {
            return false;
        }
        if info.enemy_tanks.contains(&p) {
            return true;
        }
        if info.friendly_tanks.contains(&p) {
            return false;
        }
    }
    false
}

/// Is there a straight-line path from `from` to `target`, unobstructed by
/// walls or any other tank? Returns the heading that reaches it.
pub fn direction_with_los_to(info: &BattleInfo, from: Point, target: Point) -> Option<Direction> {
    let max_steps = (info.board_width + info.board_height) as usize;
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        let mut p = from;
        let mut hit = false;
        for _ in 0..max_steps {
            p = p.add(dx, dy).wrap(info.board_width, info.board_height);
            if p == target {
                hit = true;
                break;
            }
            if info.cell_at(p) == CellKind::Wall || info.is_tank_at(p) {
                break;
            }
        }
        if hit {
            return Some(dir);
        }
    }
    None
}

/// The single 45/90 rotation action that makes the most progress from
/// `current` toward `target`.
pub fn rotation_action(current: Direction, target: Direction) -> ActionRequest {
    let diff = (target.index() as i32 - current.index() as i32).rem_euclid(8);
    let right = diff;
    let left = 8 - diff;
    if right <= left {
        if right <= 1 {
            ActionRequest::RotateRight45
        } else {
            ActionRequest::RotateRight90
        }
    } else if left <= 1 {
        ActionRequest::RotateLeft45
    } else {
        ActionRequest::RotateLeft90
    }
}

/// The best (lowest-cost) safe move from `from`, given the tank is facing
/// `heading`. `MoveForward` costs 1 when already aligned; otherwise cost is
/// the minimum rotation-step count plus 1. The current cell costs 0.
pub fn best_safe_move(info: &BattleInfo, from: Point, heading: Direction) -> ActionRequest {
    let mut best: Option<(i32, ActionRequest)> = None;

    if is_position_safe(info, from) {
        best = Some((0, ActionRequest::DoNothing));
    }

    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        let candidate = from.add(dx, dy).wrap(info.board_width, info.board_height);
        if !is_position_safe(info, candidate) {
            continue;
        }
        let (action, cost) = if dir == heading {
            (ActionRequest::MoveForward, 1)
        } else {
            (rotation_action(heading, dir), heading.steps_to(dir) + 1)
        };
        if best.map_or(true, |(c, _)| cost < c) {
            best = Some((cost, action));
        }
    }

    best.map(|(_, a)| a).unwrap_or(ActionRequest::DoNothing)
}

/// The wrapped-adjacent heading from `from` to `to`. Panics if `to` is not
/// one of `from`'s eight neighbors — callers only use this on path steps
/// already known to be adjacent.
pub fn direction_between(from: Point, to: Point, w: i32, h: i32) -> Direction {
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        if from.add(dx, dy).wrap(w, h) == to {
            return dir;
        }
    }
    panic!("direction_between called on non-adjacent points");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_info(w: i32, h: i32) -> BattleInfo {
        BattleInfo {
            board_width: w,
            board_height: h,
            cells: vec![CellKind::Empty; (w * h) as usize],
            friendly_tanks: vec![],
            enemy_tanks: vec![],
            shells: vec![],
            own_position: Point::new(0, 0),
            target: None,
        }
    }

    #[test]
    fn danger_detects_colinear_shell_within_three() {
        let mut info = empty_info(10, 10);
        info.shells = vec![Point::new(2, 5)];
        assert!(is_in_danger(&info, Point::new(5, 5)));
    }

    #[test]
    fn danger_ignores_far_shell() {
        let mut info = empty_info(10, 10);
        info.shells = vec![Point::new(0, 0)];
        assert!(!is_in_danger(&info, Point::new(5, 5)));
    }

    #[test]
    fn best_safe_move_prefers_move_forward_when_aligned() {
        let info = empty_info(10, 10);
        let action = best_safe_move(&info, Point::new(5, 5), Direction::Right);
        assert_eq!(action, ActionRequest::MoveForward);
    }

    #[test]
    fn rotation_action_picks_shorter_arc() {
        assert_eq!(rotation_action(Direction::Up, Direction::UpRight), ActionRequest::RotateRight45);
        assert_eq!(rotation_action(Direction::Up, Direction::UpLeft), ActionRequest::RotateLeft45);
    }
}
