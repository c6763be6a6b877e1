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

//! Chapter 3, Solving Problems by Searching: a waste-cleaning agent that routes with A*.
//!
//! `clean` runs the A* agent, `random` runs the random-walk baseline from Chapter 2 on the same
//! kind of grid, and `evaluate` compares the two over many random dirt placements.

mod config;
mod evaluate;
mod logging;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use waste_cleaner::random_walk::{RandomWalkAgent, WasteWorldEnvironment};
use waste_cleaner::{
    run_cleaning_with, AStar, CleaningAgent, Environment, Position, Simulation, Termination,
};

use crate::config::{EvaluateConfig, RunConfig, MAX_SIZE, MIN_SIZE};
use crate::render::{EventFormat, EventPrinter};

#[derive(Parser)]
#[command(
    name = "waste-agents",
    version,
    about = "Clean waste off a square grid with an A* routing agent"
)]
struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean the grid by repeatedly routing to the nearest waste with A*.
    Clean {
        #[command(flatten)]
        world: WorldArgs,

        /// Print events and the final report as JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// Clean the grid with the random-walk baseline.
    Random {
        #[command(flatten)]
        world: WorldArgs,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Give up after this many steps.
        #[arg(long, default_value_t = 100_000)]
        max_steps: usize,
    },
    /// Compare both agents over random dirt placements.
    Evaluate {
        #[arg(long, default_value_t = EvaluateConfig::default().size as u16,
              value_parser = clap::value_parser!(u16).range(MIN_SIZE..=MAX_SIZE))]
        size: u16,

        /// Dirty cells per trial.
        #[arg(long, default_value_t = EvaluateConfig::default().dirty)]
        dirty: usize,

        #[arg(long, default_value_t = EvaluateConfig::default().trials)]
        trials: u64,

        #[arg(long, default_value_t = EvaluateConfig::default().seed)]
        seed: u64,

        /// Step limit for each random-walk run.
        #[arg(long, default_value_t = EvaluateConfig::default().max_steps)]
        max_steps: usize,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct WorldArgs {
    /// Grid side length.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(MIN_SIZE..=MAX_SIZE))]
    size: u16,

    /// Where the agent starts.
    #[arg(long, value_name = "X,Y", default_value = "0,0")]
    start: Position,

    /// A cell holding waste. Repeat for more cells.
    #[arg(long = "waste", value_name = "X,Y")]
    waste: Vec<Position>,
}

impl From<WorldArgs> for RunConfig {
    fn from(args: WorldArgs) -> Self {
        RunConfig::new(usize::from(args.size), args.start, args.waste)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match cli.command {
        Command::Clean { world, json } => cmd_clean(world.into(), json),
        Command::Random {
            world,
            seed,
            max_steps,
        } => cmd_random(world.into(), seed, max_steps),
        Command::Evaluate {
            size,
            dirty,
            trials,
            seed,
            max_steps,
            json,
        } => cmd_evaluate(
            EvaluateConfig {
                size: usize::from(size),
                dirty,
                trials,
                seed,
                max_steps,
            },
            json,
        ),
    }
}

fn cmd_clean(config: RunConfig, json: bool) -> Result<()> {
    let mut grid = config.build_grid()?;
    let mut agent = CleaningAgent::new(config.start);
    let format = if json {
        EventFormat::Json
    } else {
        println!("{}\n", grid.render_with_agent(agent.position()));
        EventFormat::Text
    };

    let mut printer = EventPrinter::new(std::io::stdout(), format);
    let report = run_cleaning_with(&mut agent, &mut grid, &AStar, &mut printer)
        .context("clean grid")?;
    printer.finish().context("write events")?;

    if json {
        println!("{}", serde_json::to_string(&report).context("encode report")?);
    } else {
        println!("\n{}\n", grid.render_with_agent(agent.position()));
        println!("moves: {}, cleaned: {}", report.moves, report.cleaned.len());
    }

    match report.termination {
        Termination::Done => {
            if !json {
                println!("Successfully cleaned the grid.");
            }
            Ok(())
        }
        Termination::Stuck { target } => bail!("failed to clean the grid, no path to {}", target),
    }
}

fn cmd_random(config: RunConfig, seed: u64, max_steps: usize) -> Result<()> {
    let grid = config.build_grid()?;
    println!("{}\n", grid.render_with_agent(config.start));

    let environment =
        WasteWorldEnvironment::new(grid, config.start).context("build random-walk world")?;
    let mut simulation =
        Simulation::new(environment, RandomWalkAgent::from_seed(seed), max_steps);
    simulation.run();

    let environment = simulation.environment();
    println!(
        "{}\n",
        environment
            .grid()
            .render_with_agent(environment.agent_location())
    );
    println!(
        "steps: {}, moves: {}, bumps: {}, score: {}",
        simulation.steps(),
        environment.moves(),
        environment.bumps(),
        simulation.score()
    );

    if !environment.is_terminal() {
        bail!("grid still dirty after {} steps", simulation.steps());
    }
    println!("Successfully cleaned the grid.");
    Ok(())
}

fn cmd_evaluate(config: EvaluateConfig, json: bool) -> Result<()> {
    let summary = evaluate::evaluate(&config)?;
    if json {
        println!("{}", serde_json::to_string(&summary).context("encode summary")?);
    } else {
        println!(
            "trials: {}, grid: {}x{}, dirty cells: {}",
            summary.trials, config.size, config.size, config.dirty
        );
        println!("A* average moves: {:.2}", summary.avg_astar_moves);
        println!("random walk average steps: {:.2}", summary.avg_random_steps);
        if summary.random_failures > 0 {
            println!(
                "random walk gave up after {} steps in {} trials",
                config.max_steps, summary.random_failures
            );
        }
    }
    Ok(())
}
