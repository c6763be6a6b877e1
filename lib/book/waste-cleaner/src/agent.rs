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

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CleanerError, CleanerResult};
use crate::event::{CleaningEvent, CleaningObserver};
use crate::grid::{CellState, Position, Surface};
use crate::path_finder::Path;

/// The cleaning robot. It only knows where it is; the surface it acts on is passed into every
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CleaningAgent {
    position: Position,
}

impl CleaningAgent {
    pub fn new(start: Position) -> Self {
        Self { position: start }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The dirty cell closest to the agent by Manhattan distance. On a tie the cell listed first
    /// wins, so passing `Surface::dirty_cells` gives the row-major first.
    pub fn select_nearest_target(&self, dirty_cells: &[Position]) -> Option<Position> {
        let mut nearest: Option<(Position, usize)> = None;
        for &cell in dirty_cells {
            let distance = self.position.manhattan_distance(&cell);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((cell, distance)),
            }
        }
        nearest.map(|(cell, _)| cell)
    }

    /// Walk `path` one cell at a time and return the number of moves made.
    ///
    /// The first element must be the agent's current position. Every later element must be in
    /// bounds and exactly one unit away on exactly one axis from where the agent stands. The
    /// first step that breaks this stops the walk with an error, leaving the agent on the last
    /// legal cell it reached. An empty path is rejected with `EmptyPath`.
    pub fn follow<S, O>(
        &mut self,
        path: &Path,
        surface: &S,
        observer: &mut O,
    ) -> CleanerResult<usize>
    where
        S: Surface + ?Sized,
        O: CleaningObserver + ?Sized,
    {
        let Some(first) = path.start() else {
            return Err(CleanerError::EmptyPath(self.position));
        };
        if first != self.position {
            return Err(CleanerError::DetachedPath {
                expected: self.position,
                actual: first,
            });
        }

        let mut moves = 0;
        for &next in path.iter().skip(1) {
            if !surface.contains(next) {
                return Err(CleanerError::OutOfBounds {
                    position: next,
                    size: surface.size(),
                });
            }
            if !self.position.is_adjacent(&next) {
                return Err(CleanerError::IllegalStep {
                    from: self.position,
                    to: next,
                });
            }
            self.position = next;
            moves += 1;
            debug!(to = %next, "moved");
            observer.observe(&CleaningEvent::Moved { to: next });
        }
        Ok(moves)
    }

    /// Clean the cell the agent stands on. The cell must hold waste.
    pub fn clean_here<S, O>(&self, surface: &mut S, observer: &mut O) -> CleanerResult<()>
    where
        S: Surface + ?Sized,
        O: CleaningObserver + ?Sized,
    {
        if surface.state(self.position)? != CellState::Waste {
            return Err(CleanerError::NotWaste(self.position));
        }
        surface.toggle(self.position)?;
        info!(at = %self.position, "cleaned");
        observer.observe(&CleaningEvent::Cleaned { at: self.position });
        Ok(())
    }
}
