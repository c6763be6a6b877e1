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

//! Random-walk baseline in the PEAS setting: the agent only senses the cell under it, sucks when
//! it is dirty and otherwise wanders in a random direction. Useful as a yardstick for how much
//! A* routing saves.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::error::{CleanerError, CleanerResult};
use crate::grid::{CellState, Grid, Position};
use crate::{Agent, Environment, Rng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WasteWorldAction {
    /// Towards row 0 (`-x`).
    Up,
    /// `+x`.
    Down,
    /// Towards column 0 (`-y`).
    Left,
    /// `+y`.
    Right,
    Suck,
    NoOp,
}

const MOVES: [WasteWorldAction; 4] = [
    WasteWorldAction::Up,
    WasteWorldAction::Down,
    WasteWorldAction::Left,
    WasteWorldAction::Right,
];

/// What the agent senses: where it is and whether the cell under it is dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WasteWorldPercept {
    pub location: Position,
    pub cell_state: CellState,
}

pub struct RandomWalkAgent {
    rng: Rng,
}

impl RandomWalkAgent {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(Rng::seed_from_u64(seed))
    }
}

impl Agent for RandomWalkAgent {
    type Action = WasteWorldAction;
    type Percept = WasteWorldPercept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        if percept.cell_state == CellState::Waste {
            WasteWorldAction::Suck
        } else {
            MOVES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(WasteWorldAction::NoOp)
        }
    }
}

/// A grid plus the location of a single agent. Moving off the edge is a bump: the agent stays
/// where it is and the bump is counted.
pub struct WasteWorldEnvironment {
    grid: Grid,
    agent_location: Position,
    moves: usize,
    bumps: usize,
}

impl WasteWorldEnvironment {
    pub fn new(grid: Grid, agent_location: Position) -> CleanerResult<Self> {
        if !grid.contains(agent_location) {
            return Err(CleanerError::OutOfBounds {
                position: agent_location,
                size: grid.size(),
            });
        }
        Ok(Self {
            grid,
            agent_location,
            moves: 0,
            bumps: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent_location(&self) -> Position {
        self.agent_location
    }

    /// Moves that changed the agent's location.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Moves that would have left the grid.
    pub fn bumps(&self) -> usize {
        self.bumps
    }

    fn destination(&self, action: WasteWorldAction) -> Option<Position> {
        let Position { x, y } = self.agent_location;
        let next = match action {
            WasteWorldAction::Up => Position::new(x.checked_sub(1)?, y),
            WasteWorldAction::Down => Position::new(x + 1, y),
            WasteWorldAction::Left => Position::new(x, y.checked_sub(1)?),
            WasteWorldAction::Right => Position::new(x, y + 1),
            WasteWorldAction::Suck | WasteWorldAction::NoOp => return None,
        };
        self.grid.contains(next).then_some(next)
    }
}

impl Environment for WasteWorldEnvironment {
    type Action = WasteWorldAction;
    type Percept = WasteWorldPercept;
    type Score = usize;

    fn percept(&self) -> Self::Percept {
        // The location is checked on construction and never leaves the grid.
        let cell_state = self
            .grid
            .state(self.agent_location)
            .unwrap_or(CellState::Clean);
        WasteWorldPercept {
            location: self.agent_location,
            cell_state,
        }
    }

    fn execute_action(&mut self, action: &Self::Action) {
        match action {
            WasteWorldAction::Suck => match self.grid.clean(self.agent_location) {
                Ok(true) => debug!(at = %self.agent_location, "sucked up waste"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "suck failed"),
            },
            WasteWorldAction::NoOp => {}
            movement => match self.destination(*movement) {
                Some(next) => {
                    self.agent_location = next;
                    self.moves += 1;
                }
                None => {
                    self.bumps += 1;
                    debug!(at = %self.agent_location, ?movement, "bumped into edge");
                }
            },
        }
    }

    fn score(&self) -> Self::Score {
        self.grid.count_clean_cells()
    }

    fn is_terminal(&self) -> bool {
        self.grid.is_clean_everywhere()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Simulation;

    fn p(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    fn percept(location: Position, cell_state: CellState) -> WasteWorldPercept {
        WasteWorldPercept {
            location,
            cell_state,
        }
    }

    #[test]
    fn test_random_walk_agent_sucks_waste() {
        let mut agent = RandomWalkAgent::from_seed(42);
        for _ in 0..20 {
            assert_eq!(
                agent.act(&percept(p(1, 1), CellState::Waste)),
                WasteWorldAction::Suck
            );
        }
    }

    #[test]
    fn test_random_walk_agent_only_moves_on_clean_cells() {
        let mut agent = RandomWalkAgent::from_seed(42);
        for _ in 0..100 {
            let action = agent.act(&percept(p(0, 0), CellState::Clean));
            assert!(MOVES.contains(&action), "action: {:?}", action);
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = RandomWalkAgent::from_seed(7);
        let mut b = RandomWalkAgent::from_seed(7);
        for _ in 0..50 {
            let clean = percept(p(0, 0), CellState::Clean);
            assert_eq!(a.act(&clean), b.act(&clean));
        }
    }

    #[test]
    fn test_environment_rejects_agent_outside_grid() {
        let grid = Grid::new(2).expect("new failed");
        assert!(WasteWorldEnvironment::new(grid, p(2, 0)).is_err());
    }

    #[test]
    fn test_environment_returns_dirty_percept() {
        let grid = Grid::with_waste(2, [p(0, 0)]).expect("with_waste failed");
        let env = WasteWorldEnvironment::new(grid, p(0, 0)).expect("new failed");
        assert_eq!(env.percept(), percept(p(0, 0), CellState::Waste));
    }

    #[test]
    fn test_environment_allows_cleaning() {
        let grid = Grid::with_waste(2, [p(0, 0), p(1, 0)]).expect("with_waste failed");
        let mut env = WasteWorldEnvironment::new(grid, p(0, 0)).expect("new failed");
        assert_eq!(env.score(), 2);
        env.execute_action(&WasteWorldAction::Suck);
        assert_eq!(env.percept(), percept(p(0, 0), CellState::Clean));
        assert_eq!(env.score(), 3);
        assert!(!env.is_terminal());

        env.execute_action(&WasteWorldAction::Down);
        assert_eq!(env.percept(), percept(p(1, 0), CellState::Waste));
        env.execute_action(&WasteWorldAction::Suck);
        assert_eq!(env.score(), 4);
        assert!(env.is_terminal());
    }

    #[test]
    fn test_suck_on_clean_cell_keeps_it_clean() {
        let grid = Grid::new(2).expect("new failed");
        let mut env = WasteWorldEnvironment::new(grid, p(1, 1)).expect("new failed");
        env.execute_action(&WasteWorldAction::Suck);
        assert!(env.grid().is_clean_everywhere());
    }

    #[test]
    fn test_moving_off_the_edge_is_a_bump() {
        let grid = Grid::new(2).expect("new failed");
        let mut env = WasteWorldEnvironment::new(grid, p(0, 0)).expect("new failed");
        env.execute_action(&WasteWorldAction::Up);
        env.execute_action(&WasteWorldAction::Left);
        assert_eq!(env.agent_location(), p(0, 0));
        assert_eq!(env.bumps(), 2);
        assert_eq!(env.moves(), 0);

        env.execute_action(&WasteWorldAction::Right);
        env.execute_action(&WasteWorldAction::Down);
        env.execute_action(&WasteWorldAction::Down);
        assert_eq!(env.agent_location(), p(1, 1));
        assert_eq!(env.moves(), 2);
        assert_eq!(env.bumps(), 3);
    }

    #[test]
    fn test_noop_does_nothing() {
        let grid = Grid::with_waste(2, [p(0, 0)]).expect("with_waste failed");
        let mut env = WasteWorldEnvironment::new(grid, p(0, 0)).expect("new failed");
        env.execute_action(&WasteWorldAction::NoOp);
        assert_eq!(env.percept(), percept(p(0, 0), CellState::Waste));
        assert_eq!(env.moves() + env.bumps(), 0);
    }

    #[test]
    fn test_random_walk_eventually_cleans_small_grid() {
        let grid = Grid::with_waste(3, [p(0, 2), p(2, 0), p(2, 2)]).expect("with_waste failed");
        let env = WasteWorldEnvironment::new(grid, p(0, 0)).expect("new failed");
        let mut simulation = Simulation::new(env, RandomWalkAgent::from_seed(42), 100_000);
        simulation.run();
        assert!(simulation.environment().is_terminal());
        assert!(simulation.steps() < 100_000);
        assert!(simulation.environment().moves() >= 6);
    }
}
