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

//! A waste-cleaning agent on a square grid.
//!
//! The agent repeatedly picks the nearest dirty cell by Manhattan distance, routes to it with A*
//! (4-directional moves, every move costs 1), walks the route and cleans the cell, until nothing
//! is dirty. See Chapter 3: Solving Problems by Searching, section 3.5.2 A* search.
//!
//! A random-walk baseline lives in `random_walk`, expressed with the PEAS traits from Chapter 2
//! below.

pub mod agent;
pub mod controller;
pub mod error;
pub mod event;
pub mod grid;
pub mod path_finder;
pub mod random_walk;

#[cfg(test)]
mod test_support;

use num_traits::Zero;

pub use agent::CleaningAgent;
pub use controller::{run_cleaning, run_cleaning_with, CleaningReport};
pub use error::{CleanerError, CleanerResult};
pub use event::{CleaningEvent, CleaningObserver, Termination};
pub use grid::{CellState, Grid, Position, Surface};
pub use path_finder::{search, AStar, CostTable, Path, PathFinder};

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type Rng = rand_pcg::Pcg64;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Score: num_traits::NumAssign + Copy;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;

    /// Whether there is nothing left for the Agent to do. A Simulation stops early once this is
    /// true.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// A Simulation runs a single Agent in multiple PEAS cycles, at most `time_steps` of them, and
/// stops early once the Environment is terminal. The Agent's score (Performance) is the sum of
/// the Environment's score after every step.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: usize,
    steps: usize,
    score: _Environment::Score,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, time_steps: usize) -> Self {
        Self {
            environment,
            agent,
            time_steps,
            steps: 0,
            score: _Environment::Score::zero(),
        }
    }

    pub fn run(&mut self) {
        while self.steps < self.time_steps && !self.environment.is_terminal() {
            let percept = self.environment.percept();
            let action = self.agent.act(&percept);
            self.environment.execute_action(&action);
            self.score += self.environment.score();
            self.steps += 1;
        }
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    /// Cycles run so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }
}
