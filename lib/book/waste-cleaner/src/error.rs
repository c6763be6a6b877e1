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

use crate::grid::Position;

/// Result alias used throughout the cleaner.
pub type CleanerResult<T> = Result<T, CleanerError>;

/// Errors raised by the grid, the path finder and the agent.
///
/// None of these are transient. The grid is static apart from the agent's own cleaning, so
/// retrying an operation with the same inputs fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanerError {
    /// A grid needs at least one cell, and `size * size` cells must be addressable.
    #[error("invalid grid size: {0}, must be at least 1 and its square must fit in usize")]
    InvalidSize(usize),

    /// Coordinate outside `[0, size)` on either axis.
    #[error("position {position} is out of bounds for a {size}x{size} grid")]
    OutOfBounds { position: Position, size: usize },

    /// No route connects start and goal.
    #[error("no path from {start} to {goal}")]
    NotFound { start: Position, goal: Position },

    /// A path step that does not move exactly one unit on exactly one axis.
    #[error("illegal step from {from} to {to}")]
    IllegalStep { from: Position, to: Position },

    /// A path whose first element is not where the agent stands.
    #[error("path starts at {actual} but agent is at {expected}")]
    DetachedPath {
        expected: Position,
        actual: Position,
    },

    /// A path with no positions at all, so it cannot start where the agent stands.
    #[error("empty path, agent is at {0}")]
    EmptyPath(Position),

    /// Cleaning was requested on a cell that holds no waste.
    #[error("nothing to clean at {0}")]
    NotWaste(Position),

    /// Could not parse an `x,y` coordinate pair.
    #[error("invalid position {0:?}, expected x,y")]
    ParsePosition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_positions() {
        let err = CleanerError::OutOfBounds {
            position: Position::new(3, 0),
            size: 3,
        };
        assert_eq!(
            err.to_string(),
            "position (3, 0) is out of bounds for a 3x3 grid"
        );

        let err = CleanerError::IllegalStep {
            from: Position::new(0, 0),
            to: Position::new(1, 1),
        };
        assert_eq!(err.to_string(), "illegal step from (0, 0) to (1, 1)");

        let err = CleanerError::EmptyPath(Position::new(2, 1));
        assert_eq!(err.to_string(), "empty path, agent is at (2, 1)");
    }
}
