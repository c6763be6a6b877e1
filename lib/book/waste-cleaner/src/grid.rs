/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CleanerError, CleanerResult};

/// A cell coordinate. `x` is the row (up is `-x`, down is `+x`) and `y` is the column (left is
/// `-y`, right is `+y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|x1 - x2| + |y1 - y2|`.
    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when `other` is exactly one unit away on exactly one axis.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// Accepts "x,y", optionally wrapped in parentheses, e.g. "2,3" or "(2, 3)".
impl FromStr for Position {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CleanerError::ParsePosition(s.to_string());
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let (x, y) = inner.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse::<usize>().map_err(|_| err())?;
        let y = y.trim().parse::<usize>().map_err(|_| err())?;
        Ok(Position::new(x, y))
    }
}

/// State of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellState {
    Clean,
    Waste,
}

impl CellState {
    fn toggled(self) -> Self {
        match self {
            CellState::Clean => CellState::Waste,
            CellState::Waste => CellState::Clean,
        }
    }
}

/// Something an agent can search over and clean.
///
/// `Grid` is the only production implementation. The search and the cleaning loop are written
/// against this trait so they never reach for a particular grid value, the agent always acts on
/// the surface it is handed.
pub trait Surface {
    /// Side length; valid coordinates are `0..size` on both axes.
    fn size(&self) -> usize;

    fn state(&self, pos: Position) -> CleanerResult<CellState>;

    fn toggle(&mut self, pos: Position) -> CleanerResult<()>;

    /// All waste cells in row-major order: increasing `x`, then increasing `y`.
    fn dirty_cells(&self) -> Vec<Position>;

    /// In-bounds orthogonal neighbours, ordered up, down, left, right.
    fn neighbors(&self, pos: Position) -> CleanerResult<Vec<Position>>;

    fn contains(&self, pos: Position) -> bool {
        pos.x < self.size() && pos.y < self.size()
    }

    fn is_clean_everywhere(&self) -> bool {
        self.dirty_cells().is_empty()
    }
}

/// Square grid of tiles, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a `size` x `size` grid with every cell clean. Fails when `size` is zero or when
    /// `size * size` does not fit in a `usize`.
    pub fn new(size: usize) -> CleanerResult<Self> {
        let cell_count = size
            .checked_mul(size)
            .filter(|&count| count > 0)
            .ok_or(CleanerError::InvalidSize(size))?;
        Ok(Self {
            size,
            cells: vec![CellState::Clean; cell_count],
        })
    }

    /// Create a grid and mark every position in `waste` dirty. Listing a position twice toggles
    /// it back to clean, same as calling `toggle` twice.
    pub fn with_waste<I>(size: usize, waste: I) -> CleanerResult<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut grid = Self::new(size)?;
        for pos in waste {
            grid.toggle(pos)?;
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    fn index(&self, pos: Position) -> CleanerResult<usize> {
        if !self.contains(pos) {
            return Err(CleanerError::OutOfBounds {
                position: pos,
                size: self.size,
            });
        }
        Ok(pos.x * self.size + pos.y)
    }

    pub fn state(&self, pos: Position) -> CleanerResult<CellState> {
        let index = self.index(pos)?;
        Ok(self.cells[index])
    }

    /// Flip a cell between clean and waste.
    pub fn toggle(&mut self, pos: Position) -> CleanerResult<()> {
        let index = self.index(pos)?;
        self.cells[index] = self.cells[index].toggled();
        Ok(())
    }

    /// Mark a cell clean. Returns whether it held waste.
    pub fn clean(&mut self, pos: Position) -> CleanerResult<bool> {
        let index = self.index(pos)?;
        let was_waste = self.cells[index] == CellState::Waste;
        self.cells[index] = CellState::Clean;
        Ok(was_waste)
    }

    pub fn is_clean_everywhere(&self) -> bool {
        self.cells.iter().all(|&cell| cell == CellState::Clean)
    }

    pub fn count_clean_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&cell| cell == CellState::Clean)
            .count()
    }

    /// Waste cells in row-major order. Nearest-target selection relies on this order to break
    /// ties, so it must stay fixed.
    pub fn dirty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == CellState::Waste)
            .map(|(index, _)| Position::new(index / self.size, index % self.size))
            .collect()
    }

    /// Orthogonal neighbours of `pos` in the order up (-x), down (+x), left (-y), right (+y).
    /// A* breaks ties between equal-cost routes by this order.
    pub fn neighbors(&self, pos: Position) -> CleanerResult<Vec<Position>> {
        self.index(pos)?;
        let mut neighbors = Vec::with_capacity(4);
        if pos.x > 0 {
            neighbors.push(Position::new(pos.x - 1, pos.y));
        }
        if pos.x + 1 < self.size {
            neighbors.push(Position::new(pos.x + 1, pos.y));
        }
        if pos.y > 0 {
            neighbors.push(Position::new(pos.x, pos.y - 1));
        }
        if pos.y + 1 < self.size {
            neighbors.push(Position::new(pos.x, pos.y + 1));
        }
        Ok(neighbors)
    }

    /// Render the grid with the agent's cell marked `A`, or `@` if the agent is standing on
    /// waste.
    pub fn render_with_agent(&self, agent: Position) -> String {
        self.render(Some(agent))
    }

    // print out cells, and row and column numbers which start at 0.
    fn render(&self, agent: Option<Position>) -> String {
        let mut s = String::with_capacity((self.size * 2 + 2) * (self.size + 1));

        s.push_str("  ");
        for y in 0..self.size {
            s.push_str(&format!("{}", y));
            s.push(if y == self.size - 1 { '\n' } else { ' ' });
        }

        for x in 0..self.size {
            s.push_str(&format!("{} ", x));
            for y in 0..self.size {
                let pos = Position::new(x, y);
                let state = self.cells[x * self.size + y];
                let c = match (agent == Some(pos), state) {
                    (true, CellState::Clean) => 'A',
                    (true, CellState::Waste) => '@',
                    (false, CellState::Clean) => '.',
                    (false, CellState::Waste) => 'W',
                };
                s.push(c);
                if y < self.size - 1 {
                    s.push(' ');
                }
            }
            if x < self.size - 1 {
                s.push('\n');
            }
        }
        s
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(None))
    }
}

impl Surface for Grid {
    fn size(&self) -> usize {
        Grid::size(self)
    }

    fn state(&self, pos: Position) -> CleanerResult<CellState> {
        Grid::state(self, pos)
    }

    fn toggle(&mut self, pos: Position) -> CleanerResult<()> {
        Grid::toggle(self, pos)
    }

    fn dirty_cells(&self) -> Vec<Position> {
        Grid::dirty_cells(self)
    }

    fn neighbors(&self, pos: Position) -> CleanerResult<Vec<Position>> {
        Grid::neighbors(self, pos)
    }

    fn contains(&self, pos: Position) -> bool {
        Grid::contains(self, pos)
    }

    fn is_clean_everywhere(&self) -> bool {
        Grid::is_clean_everywhere(self)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_grid_starts_clean() {
        let grid = Grid::new(4).expect("new failed");
        for x in 0..4 {
            for y in 0..4 {
                let state = grid.state(Position::new(x, y)).expect("state failed");
                assert_eq!(state, CellState::Clean, "x: {}, y: {}", x, y);
            }
        }
        assert!(grid.is_clean_everywhere());
        assert!(grid.dirty_cells().is_empty());
    }

    #[test]
    fn test_zero_size_grid_is_rejected() {
        assert_eq!(Grid::new(0), Err(CleanerError::InvalidSize(0)));
    }

    #[test]
    fn test_size_whose_cell_count_overflows_is_rejected() {
        let size = 1usize << (usize::BITS / 2);
        assert_eq!(Grid::new(size), Err(CleanerError::InvalidSize(size)));
        assert_eq!(Grid::new(usize::MAX), Err(CleanerError::InvalidSize(usize::MAX)));
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1).expect("new failed");
        assert_eq!(grid.neighbors(Position::new(0, 0)), Ok(vec![]));
    }

    #[test]
    fn test_toggle_out_of_bounds_fails_instead_of_clamping() {
        let mut grid = Grid::new(3).expect("new failed");
        let pos = Position::new(0, 3);
        assert_eq!(
            grid.toggle(pos),
            Err(CleanerError::OutOfBounds {
                position: pos,
                size: 3
            })
        );
        assert!(grid.is_clean_everywhere());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut grid = Grid::with_waste(2, [Position::new(0, 1)]).expect("with_waste failed");
        assert_eq!(grid.clean(Position::new(0, 1)), Ok(true));
        assert_eq!(grid.clean(Position::new(0, 1)), Ok(false));
        assert!(grid.is_clean_everywhere());
    }

    #[test]
    fn test_dirty_cells_are_row_major() {
        let grid = Grid::with_waste(
            5,
            [
                Position::new(4, 0),
                Position::new(0, 4),
                Position::new(2, 1),
                Position::new(2, 0),
            ],
        )
        .expect("with_waste failed");
        assert_eq!(
            grid.dirty_cells(),
            vec![
                Position::new(0, 4),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(4, 0),
            ]
        );
        assert!(!grid.is_clean_everywhere());
        assert_eq!(grid.count_clean_cells(), 21);
    }

    #[test]
    fn test_neighbors_order_is_up_down_left_right() {
        let grid = Grid::new(3).expect("new failed");
        assert_eq!(
            grid.neighbors(Position::new(1, 1)),
            Ok(vec![
                Position::new(0, 1),
                Position::new(2, 1),
                Position::new(1, 0),
                Position::new(1, 2),
            ])
        );
        assert_eq!(
            grid.neighbors(Position::new(0, 0)),
            Ok(vec![Position::new(1, 0), Position::new(0, 1)])
        );
        assert_eq!(
            grid.neighbors(Position::new(2, 2)),
            Ok(vec![Position::new(1, 2), Position::new(2, 1)])
        );
    }

    #[test]
    fn test_neighbors_of_out_of_bounds_position_fails() {
        let grid = Grid::new(2).expect("new failed");
        assert!(matches!(
            grid.neighbors(Position::new(2, 0)),
            Err(CleanerError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_display_marks_waste() {
        let grid = Grid::with_waste(3, [Position::new(1, 2)]).expect("with_waste failed");
        assert_eq!(format!("{}", grid), "  0 1 2\n0 . . .\n1 . . W\n2 . . .");
    }

    #[test]
    fn test_render_with_agent() {
        let grid = Grid::with_waste(2, [Position::new(1, 1)]).expect("with_waste failed");
        assert_eq!(
            grid.render_with_agent(Position::new(0, 0)),
            "  0 1\n0 A .\n1 . W"
        );
        assert_eq!(
            grid.render_with_agent(Position::new(1, 1)),
            "  0 1\n0 . .\n1 . @"
        );
    }

    #[test]
    fn test_parse_position() {
        assert_eq!("2,3".parse::<Position>(), Ok(Position::new(2, 3)));
        assert_eq!(" (0, 4) ".parse::<Position>(), Ok(Position::new(0, 4)));
        assert_eq!(
            "2;3".parse::<Position>(),
            Err(CleanerError::ParsePosition("2;3".to_string()))
        );
        assert!("-1,0".parse::<Position>().is_err());
    }

    proptest! {
        #[test]
        fn test_toggle_twice_restores_state(
            size in 1..8usize,
            x in 0..8usize,
            y in 0..8usize,
            pre_dirty in any::<bool>(),
        ) {
            let pos = Position::new(x % size, y % size);
            let mut grid = Grid::new(size).expect("new failed");
            if pre_dirty {
                grid.toggle(pos).expect("toggle failed");
            }
            let before = grid.clone();
            grid.toggle(pos).expect("toggle failed");
            prop_assert_ne!(&grid, &before);
            grid.toggle(pos).expect("toggle failed");
            prop_assert_eq!(grid, before);
        }

        #[test]
        fn test_neighbors_are_adjacent_and_in_bounds(
            size in 1..8usize,
            x in 0..8usize,
            y in 0..8usize,
        ) {
            let grid = Grid::new(size).expect("new failed");
            let pos = Position::new(x % size, y % size);
            let neighbors = grid.neighbors(pos).expect("neighbors failed");
            prop_assert!(neighbors.len() <= 4);
            for n in neighbors {
                prop_assert!(grid.contains(n));
                prop_assert!(pos.is_adjacent(&n));
            }
        }
    }
}
