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

//! Surfaces for exercising failure paths that a plain `Grid` cannot reach.

use crate::error::CleanerResult;
use crate::grid::{CellState, Grid, Position, Surface};

/// A grid split by a wall running down between column `wall_after_y` and the next column.
/// Nothing crosses the wall, so cells on either side cannot reach each other.
#[derive(Debug, Clone)]
pub(crate) struct WalledGrid {
    pub(crate) grid: Grid,
    wall_after_y: usize,
}

impl WalledGrid {
    pub(crate) fn new(grid: Grid, wall_after_y: usize) -> Self {
        Self { grid, wall_after_y }
    }

    fn same_side(&self, a: Position, b: Position) -> bool {
        (a.y <= self.wall_after_y) == (b.y <= self.wall_after_y)
    }
}

impl Surface for WalledGrid {
    fn size(&self) -> usize {
        self.grid.size()
    }

    fn state(&self, pos: Position) -> CleanerResult<CellState> {
        self.grid.state(pos)
    }

    fn toggle(&mut self, pos: Position) -> CleanerResult<()> {
        self.grid.toggle(pos)
    }

    fn dirty_cells(&self) -> Vec<Position> {
        self.grid.dirty_cells()
    }

    fn neighbors(&self, pos: Position) -> CleanerResult<Vec<Position>> {
        Ok(self
            .grid
            .neighbors(pos)?
            .into_iter()
            .filter(|&n| self.same_side(pos, n))
            .collect())
    }
}
