//! Collision resolution, invoked twice per engine step (C5).
//!
//! Rules are applied in one fixed sweep per call; a snapshot of live
//! shells/tanks is regrouped by position before each rule so that an
//! entity destroyed by an earlier rule in the same sweep cannot also
//! trigger a later one.

use std::collections::HashMap;

use crate::board::{Board, CellKind};
use crate::entities::{Shell, Tank};
use crate::geometry::Point;

/// Run one collision sub-step. `tank_prev_positions`, when present, holds
/// each tank's position before this sub-step's moves were applied and
/// enables the swap rule; pass `None` for the first sub-step of a step,
/// where tanks have not yet moved.
pub fn resolve(board: &mut Board, tanks: &mut [Tank], shells: &mut [Shell], tank_prev_positions: Option<&[Point]>) {
    resolve_shell_wall(board, shells);
    resolve_shell_shell(shells);
    resolve_shell_tank(shells, tanks);
    resolve_tank_mine(board, tanks);
    resolve_tank_tank_colocation(tanks);
    if let Some(prev) = tank_prev_positions {
        resolve_tank_tank_swap(tanks, prev);
    }
}

fn live_shell_positions(shells: &[Shell]) -> HashMap<Point, Vec<usize>> {
    let mut map: HashMap<Point, Vec<usize>> = HashMap::new();
    for (i, s) in shells.iter().enumerate() {
        if !s.destroyed {
            map.entry(s.position).or_default().push(i);
        }
    }
    map
}

fn resolve_shell_wall(board: &mut Board, shells: &mut [Shell]) {
    for (pos, idxs) in live_shell_positions(shells) {
        if board.cell_kind(pos) == CellKind::Wall {
            board.damage_wall(pos);
            for i in idxs {
                shells[i].destroyed = true;
            }
        }
    }
}

fn resolve_shell_shell(shells: &mut [Shell]) {
    for (_pos, idxs) in live_shell_positions(shells) {
        if idxs.len() >= 2 {
            for i in idxs {
                shells[i].destroyed = true;
            }
        }
    }
}

fn resolve_shell_tank(shells: &mut [Shell], tanks: &mut [Tank]) {
    let shell_groups = live_shell_positions(shells);
    for tank in tanks.iter_mut() {
        if tank.destroyed {
            continue;
        }
        if let Some(idxs) = shell_groups.get(&tank.position) {
            tank.destroyed = true;
            tank.killed_this_step = true;
            for &i in idxs {
                shells[i].destroyed = true;
            }
        }
    }
}

fn resolve_tank_mine(board: &mut Board, tanks: &mut [Tank]) {
    for tank in tanks.iter_mut() {
        if tank.destroyed {
            continue;
        }
        if board.cell_kind(tank.position) == CellKind::Mine {
            tank.destroyed = true;
            tank.killed_this_step = true;
            board.consume_mine(tank.position);
        }
    }
}

fn resolve_tank_tank_colocation(tanks: &mut [Tank]) {
    let mut groups: HashMap<Point, Vec<usize>> = HashMap::new();
    for (i, t) in tanks.iter().enumerate() {
        if !t.destroyed {
            groups.entry(t.position).or_default().push(i);
        }
    }
    for (_pos, idxs) in groups {
        if idxs.len() >= 2 {
            for i in idxs {
                tanks[i].destroyed = true;
                tanks[i].killed_this_step = true;
            }
        }
    }
}

fn resolve_tank_tank_swap(tanks: &mut [Tank], prev: &[Point]) {
    let n = tanks.len();
    for i in 0..n {
        if tanks[i].destroyed {
            continue;
        }
        for j in (i + 1)..n {
            if tanks[j].destroyed {
                continue;
            }
            if prev[i] == tanks[j].position && prev[j] == tanks[i].position && prev[i] != prev[j] {
                tanks[i].destroyed = true;
                tanks[i].killed_this_step = true;
                tanks[j].destroyed = true;
                tanks[j].killed_this_step = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;

    fn tank(id: u32, p: Point) -> Tank {
        Tank::new(id, p, Direction::Right, 1)
    }

    #[test]
    fn shell_destroys_against_wall_and_damages_it() {
        let (mut board, _, _) = Board::from_char_grid(3, 1, &["#  ".to_string()]);
        let mut shells = vec![Shell::new(1, Point::new(0, 0), Direction::Right)];
        let mut tanks: Vec<Tank> = vec![];
        resolve(&mut board, &mut tanks, &mut shells, None);
        assert!(shells[0].destroyed);
        assert_eq!(board.wall_health(Point::new(0, 0)), Some(1));
    }

    #[test]
    fn second_hit_destroys_the_wall_and_absorbs_co_located_shell() {
        let (mut board, _, _) = Board::from_char_grid(3, 1, &["#  ".to_string()]);
        board.damage_wall(Point::new(0, 0));
        let mut shells = vec![
            Shell::new(1, Point::new(0, 0), Direction::Right),
            Shell::new(2, Point::new(0, 0), Direction::Right),
        ];
        let mut tanks: Vec<Tank> = vec![];
        resolve(&mut board, &mut tanks, &mut shells, None);
        assert!(shells.iter().all(|s| s.destroyed));
        assert_eq!(board.cell_kind(Point::new(0, 0)), CellKind::Empty);
    }

    #[test]
    fn co_located_shells_destroy_each_other() {
        let mut board = Board::empty(5, 5);
        let mut shells = vec![
            Shell::new(1, Point::new(2, 2), Direction::Right),
            Shell::new(2, Point::new(2, 2), Direction::Left),
        ];
        let mut tanks: Vec<Tank> = vec![];
        resolve(&mut board, &mut tanks, &mut shells, None);
        assert!(shells.iter().all(|s| s.destroyed));
    }

    #[test]
    fn shell_destroys_tank_on_same_cell() {
        let mut board = Board::empty(5, 5);
        let mut shells = vec![Shell::new(2, Point::new(1, 1), Direction::Right)];
        let mut tanks = vec![tank(1, Point::new(1, 1))];
        resolve(&mut board, &mut tanks, &mut shells, None);
        assert!(tanks[0].destroyed);
        assert!(shells[0].destroyed);
    }

    #[test]
    fn tank_entering_mine_is_destroyed_and_mine_consumed() {
        let (mut board, _, _) = Board::from_char_grid(3, 1, &[" @ ".to_string()]);
        let mut shells: Vec<Shell> = vec![];
        let mut tanks = vec![tank(1, Point::new(1, 0))];
        resolve(&mut board, &mut tanks, &mut shells, None);
        assert!(tanks[0].destroyed);
        assert_eq!(board.cell_kind(Point::new(1, 0)), CellKind::Empty);
    }

    #[test]
    fn tanks_co_locating_destroy_each_other() {
        let mut board = Board::empty(5, 5);
        let mut shells: Vec<Shell> = vec![];
        let mut tanks = vec![tank(1, Point::new(2, 2)), tank(2, Point::new(2, 2))];
        resolve(&mut board, &mut tanks, &mut shells, None);
        assert!(tanks.iter().all(|t| t.destroyed));
    }

    #[test]
    fn swapping_tanks_destroy_each_other() {
        let mut board = Board::empty(5, 5);
        let mut shells: Vec<Shell> = vec![];
        let prev = vec![Point::new(1, 1), Point::new(2, 1)];
        let mut tanks = vec![tank(1, Point::new(2, 1)), tank(2, Point::new(1, 1))];
        resolve(&mut board, &mut tanks, &mut shells, Some(&prev));
        assert!(tanks.iter().all(|t| t.destroyed));
    }
}
