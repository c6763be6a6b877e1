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

use anyhow::{ensure, Context, Result};
use waste_cleaner::{Grid, Position};

/// Smallest grid side the command line accepts.
pub const MIN_SIZE: i64 = 2;

/// Largest grid side the command line accepts. The library itself takes any size of at least 1.
pub const MAX_SIZE: i64 = 5;

/// One cleaning run: grid size, where the agent starts and which cells hold waste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub size: usize,
    pub start: Position,
    pub waste: Vec<Position>,
}

impl RunConfig {
    pub fn new(size: usize, start: Position, waste: Vec<Position>) -> Self {
        Self { size, start, waste }
    }

    /// Build the grid and check the agent starts on it.
    pub fn build_grid(&self) -> Result<Grid> {
        let grid = Grid::with_waste(self.size, self.waste.iter().copied())
            .context("mark waste cells")?;
        ensure!(
            grid.contains(self.start),
            "start {} is outside the grid, coordinates must be between (0, 0) and ({}, {})",
            self.start,
            self.size - 1,
            self.size - 1
        );
        Ok(grid)
    }
}

/// Settings for comparing the A* cleaner with the random-walk baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluateConfig {
    pub size: usize,
    pub dirty: usize,
    pub trials: u64,
    pub seed: u64,
    pub max_steps: usize,
}

impl EvaluateConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.size > 0, "grid size must be at least 1");
        ensure!(
            self.dirty <= self.size * self.size,
            "cannot place {} dirty cells on a {}x{} grid",
            self.dirty,
            self.size,
            self.size
        );
        ensure!(self.trials > 0, "need at least one trial");
        Ok(())
    }
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            size: 5,
            dirty: 3,
            trials: 100,
            seed: 42,
            max_steps: 100_000,
        }
    }
}
