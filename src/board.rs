//! The grid and its cell kinds (C1).

use std::collections::HashMap;

use crate::config::WALL_STARTING_HEALTH;
use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Wall,
    Mine,
}

/// A spawn found while parsing a character grid.
#[derive(Copy, Clone, Debug)]
pub struct TankSpawn {
    pub player_id: u32,
    pub position: Point,
}

pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    wall_health: HashMap<Point, u32>,
}

impl Board {
    pub fn empty(width: i32, height: i32) -> Self {
        Board {
            width,
            height,
            cells: vec![CellKind::Empty; (width * height) as usize],
            wall_health: HashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, p: Point) -> usize {
        let w = self.wrap(p);
        (w.y * self.width + w.x) as usize
    }

    pub fn wrap(&self, p: Point) -> Point {
        p.wrap(self.width, self.height)
    }

    pub fn cell_kind(&self, p: Point) -> CellKind {
        self.cells[self.index(p)]
    }

    pub fn set_cell_kind(&mut self, p: Point, kind: CellKind) {
        let idx = self.index(p);
        self.cells[idx] = kind;
    }

    pub fn wall_health(&self, p: Point) -> Option<u32> {
        self.wall_health.get(&self.wrap(p)).copied()
    }

    pub fn can_move_to(&self, p: Point) -> bool {
        self.cell_kind(p) != CellKind::Wall
    }

    pub fn step_distance(&self, a: Point, b: Point) -> i32 {
        a.step_distance(b, self.width, self.height)
    }

    fn place_wall(&mut self, p: Point) {
        self.set_cell_kind(p, CellKind::Wall);
        self.wall_health.insert(self.wrap(p), WALL_STARTING_HEALTH);
    }

    /// Decrement a wall's HP. Returns `true` if the wall vanished this
    /// call (cell becomes Empty, HP entry removed). No-op on a non-Wall
    /// cell.
    pub fn damage_wall(&mut self, p: Point) -> bool {
        let wp = self.wrap(p);
        if self.cell_kind(wp) != CellKind::Wall {
            return false;
        }
        let hp = self.wall_health.get_mut(&wp).expect("Wall cell must have HP entry");
        *hp -= 1;
        if *hp == 0 {
            self.wall_health.remove(&wp);
            self.set_cell_kind(wp, CellKind::Empty);
            true
        } else {
            false
        }
    }

    /// Consume a Mine at `p`, turning the cell Empty. No-op if not a Mine.
    pub fn consume_mine(&mut self, p: Point) {
        if self.cell_kind(p) == CellKind::Mine {
            self.set_cell_kind(p, CellKind::Empty);
        }
    }

    /// Build a board from a character grid, padding short rows/short grids
    /// with spaces and ignoring extra rows/columns. Returns the board, the
    /// tank spawns found (in row-major scan order), and any warnings for
    /// unrecognized characters.
    pub fn from_char_grid(width: i32, height: i32, rows: &[String]) -> (Board, Vec<TankSpawn>, Vec<String>) {
        let mut board = Board::empty(width, height);
        let mut spawns = Vec::new();
        let mut warnings = Vec::new();

        for y in 0..height {
            let row = rows.get(y as usize).map(String::as_str).unwrap_or("");
            for x in 0..width {
                let ch = row.chars().nth(x as usize).unwrap_or(' ');
                let p = Point::new(x, y);
                match ch {
                    '#' => board.place_wall(p),
                    '@' => board.set_cell_kind(p, CellKind::Mine),
                    '1'..='9' => {
                        spawns.push(TankSpawn {
                            player_id: ch.to_digit(10).unwrap(),
                            position: p,
                        });
                    }
                    ' ' => {}
                    other => {
                        warnings.push(format!(
                            "unknown character '{}' at row {}, col {} treated as empty",
                            other, y, x
                        ));
                    }
                }
            }
        }

        (board, spawns, warnings)
    }

    /// An independent copy of this board, for handing to a task that needs
    /// its own mutable state (dispatch across a worker pool, a concurrent
    /// comparative/competitive run). `Board` has no `Clone` impl on
    /// purpose, so callers think about aliasing; this rebuilds one from a
    /// fresh char-grid snapshot instead of deriving it.
    pub fn deep_clone(&self) -> Board {
        let rows: Vec<String> = self.to_string().lines().map(String::from).collect();
        Board::from_char_grid(self.width, self.height, &rows).0
    }

    /// Render the board back into a character grid (without tanks or
    /// shells — see `view` for the full layered snapshot).
    pub fn to_string(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.cell_kind(Point::new(x, y)) {
                    CellKind::Empty => ' ',
                    CellKind::Wall => '#',
                    CellKind::Mine => '@',
                };
                out.push(ch);
            }
            if y + 1 < self.height {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_starts_at_health_two() {
        let (board, _, _) = Board::from_char_grid(3, 1, &["#  ".to_string()]);
        assert_eq!(board.wall_health(Point::new(0, 0)), Some(2));
    }

    #[test]
    fn damage_wall_destroys_at_zero_hp() {
        let (mut board, _, _) = Board::from_char_grid(3, 1, &["#  ".to_string()]);
        assert!(!board.damage_wall(Point::new(0, 0)));
        assert!(board.damage_wall(Point::new(0, 0)));
        assert_eq!(board.cell_kind(Point::new(0, 0)), CellKind::Empty);
        assert_eq!(board.wall_health(Point::new(0, 0)), None);
    }

    #[test]
    fn short_row_is_padded_with_spaces() {
        let (board, _, _) = Board::from_char_grid(4, 1, &["#".to_string()]);
        assert_eq!(board.cell_kind(Point::new(3, 0)), CellKind::Empty);
    }

    #[test]
    fn unknown_character_warns_and_becomes_empty() {
        let (board, _, warnings) = Board::from_char_grid(1, 1, &["x".to_string()]);
        assert_eq!(board.cell_kind(Point::new(0, 0)), CellKind::Empty);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn digits_produce_spawns_and_empty_cells() {
        let (board, spawns, _) = Board::from_char_grid(2, 1, &["12".to_string()]);
        assert_eq!(board.cell_kind(Point::new(0, 0)), CellKind::Empty);
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].player_id, 1);
        assert_eq!(spawns[1].player_id, 2);
    }

    #[test]
    fn to_string_round_trips_cell_kinds() {
        let (board, _, _) = Board::from_char_grid(3, 2, &["# @".to_string(), "   ".to_string()]);
        let (rebuilt, _, _) = Board::from_char_grid(3, 2, &board.to_string().lines().map(String::from).collect::<Vec<_>>());
        for y in 0..2 {
            for x in 0..3 {
                let p = Point::new(x, y);
                assert_eq!(board.cell_kind(p), rebuilt.cell_kind(p));
            }
        }
    }
}
