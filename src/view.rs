//! Read-only world snapshot handed to algorithms (C3).

use crate::board::{Board, CellKind};
use crate::entities::{Shell, Tank};
use crate::geometry::Point;

/// An immutable snapshot of the board, tanks, and shells at a single
/// instant. Layering order (lowest to highest): cell, shell, tank,
/// own-tank marker.
pub struct WorldView {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    tanks: Vec<Tank>,
    shells: Vec<Shell>,
}

impl WorldView {
    pub fn capture(board: &Board, tanks: &[Tank], shells: &[Shell]) -> Self {
        let width = board.width();
        let height = board.height();
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(board.cell_kind(Point::new(x, y)));
            }
        }
        WorldView {
            width,
            height,
            cells,
            tanks: tanks.to_vec(),
            shells: shells.to_vec(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn wrap(&self, p: Point) -> Point {
        p.wrap(self.width, self.height)
    }

    pub fn cell_kind_at(&self, p: Point) -> CellKind {
        let w = self.wrap(p);
        self.cells[(w.y * self.width + w.x) as usize]
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    /// Character at `p` as seen by `own_tank`, if any (pass `None` for
    /// result/final snapshots, which omit the own-tank marker). An
    /// out-of-range query (beyond the grid once unwrapped) reports `&`;
    /// since all coordinates wrap, this only triggers for callers that
    /// pass already-invalid indices.
    pub fn char_at(&self, p: Point, own_tank_position: Option<Point>) -> char {
        if p.x < i32::MIN || p.y < i32::MIN {
            return '&';
        }
        let wp = self.wrap(p);

        if let Some(own) = own_tank_position {
            if self.wrap(own) == wp {
                return '%';
            }
        }

        if let Some(tank) = self.tanks.iter().find(|t| !t.destroyed && t.position == wp) {
            return std::char::from_digit(tank.player_id, 10).unwrap_or('?');
        }

        if self.shells.iter().any(|s| !s.destroyed && s.position == wp) {
            return '*';
        }

        match self.cell_kind_at(wp) {
            CellKind::Empty => ' ',
            CellKind::Wall => '#',
            CellKind::Mine => '@',
        }
    }

    /// Render the full grid, row by row, from this tank's point of view.
    /// Pass `None` for a result/final snapshot (no own-tank marker).
    pub fn render(&self, own_tank_position: Option<Point>) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.char_at(Point::new(x, y), own_tank_position));
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
    use crate::geometry::Direction;

    fn sample() -> (Board, Vec<Tank>, Vec<Shell>) {
        let (board, spawns, _) = Board::from_char_grid(3, 1, &["1 2".to_string()]);
        let tanks: Vec<Tank> = spawns
            .iter()
            .map(|s| Tank::new(s.player_id, s.position, Direction::Right, 1))
            .collect();
        (board, tanks, vec![])
    }

    #[test]
    fn own_tank_marker_overrides_digit() {
        let (board, tanks, shells) = sample();
        let view = WorldView::capture(&board, &tanks, &shells);
        let own = tanks[0].position;
        assert_eq!(view.char_at(own, Some(own)), '%');
    }

    #[test]
    fn non_own_tank_shows_digit() {
        let (board, tanks, shells) = sample();
        let view = WorldView::capture(&board, &tanks, &shells);
        assert_eq!(view.char_at(tanks[1].position, Some(tanks[0].position)), '2');
    }

    #[test]
    fn final_snapshot_omits_own_marker() {
        let (board, tanks, shells) = sample();
        let view = WorldView::capture(&board, &tanks, &shells);
        assert_eq!(view.char_at(tanks[0].position, None), '1');
    }

    #[test]
    fn shell_layers_above_cell_but_below_tank() {
        let (board, tanks, _) = sample();
        let shell = Shell::new(1, Point::new(1, 0), Direction::Right);
        let view = WorldView::capture(&board, &tanks, &[shell]);
        assert_eq!(view.char_at(Point::new(1, 0), None), '*');
    }
}
