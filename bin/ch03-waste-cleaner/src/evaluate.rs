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

//! Run both agents over many random dirt placements and compare them.
//!
//! Every trial derives its own RNG from the base seed and its trial number, so results do not
//! depend on how rayon schedules the trials.

use anyhow::{ensure, Context, Result};
use rand::seq::SliceRandom;
use rand::{Rng as _, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use waste_cleaner::random_walk::{RandomWalkAgent, WasteWorldEnvironment};
use waste_cleaner::{
    run_cleaning, CleaningAgent, Environment, Grid, Position, Rng, Simulation, Termination,
};

use crate::config::EvaluateConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    pub astar_moves: usize,
    pub random_steps: usize,
    pub random_cleaned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub trials: usize,
    pub avg_astar_moves: f64,
    pub avg_random_steps: f64,
    pub random_failures: usize,
}

pub fn run_trial(config: &EvaluateConfig, trial: u64) -> Result<TrialOutcome> {
    let mut rng = Rng::seed_from_u64(config.seed.wrapping_add(trial));

    let cells: Vec<Position> = (0..config.size)
        .flat_map(|x| (0..config.size).map(move |y| Position::new(x, y)))
        .collect();
    let waste: Vec<Position> = cells
        .choose_multiple(&mut rng, config.dirty)
        .copied()
        .collect();
    let start = *cells.choose(&mut rng).context("grid has no cells")?;

    let mut grid = Grid::with_waste(config.size, waste).context("build trial grid")?;
    let baseline_grid = grid.clone();

    let mut agent = CleaningAgent::new(start);
    let report = run_cleaning(&mut agent, &mut grid).context("run A* cleaner")?;
    ensure!(
        report.termination == Termination::Done,
        "trial {} ended {}",
        trial,
        report.termination
    );

    let environment =
        WasteWorldEnvironment::new(baseline_grid, start).context("build baseline world")?;
    let walker = RandomWalkAgent::new(Rng::seed_from_u64(rng.gen()));
    let mut simulation = Simulation::new(environment, walker, config.max_steps);
    simulation.run();

    let outcome = TrialOutcome {
        astar_moves: report.moves,
        random_steps: simulation.steps(),
        random_cleaned: simulation.environment().is_terminal(),
    };
    debug!(trial, ?outcome, "trial finished");
    Ok(outcome)
}

pub fn evaluate(config: &EvaluateConfig) -> Result<Summary> {
    config.validate()?;
    info!(
        size = config.size,
        dirty = config.dirty,
        trials = config.trials,
        "evaluating"
    );

    let outcomes = (0..config.trials)
        .into_par_iter()
        .map(|trial| run_trial(config, trial))
        .collect::<Result<Vec<_>>>()?;

    Ok(summarize(&outcomes))
}

fn summarize(outcomes: &[TrialOutcome]) -> Summary {
    let trials = outcomes.len();
    let average = |total: usize| {
        if trials == 0 {
            0.0
        } else {
            total as f64 / trials as f64
        }
    };
    Summary {
        trials,
        avg_astar_moves: average(outcomes.iter().map(|o| o.astar_moves).sum()),
        avg_random_steps: average(outcomes.iter().map(|o| o.random_steps).sum()),
        random_failures: outcomes.iter().filter(|o| !o.random_cleaned).count(),
    }
}
