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

//! The cleaning loop.
//!
//! One run is a small state machine:
//!
//! ```text
//! Scanning -> Routing -> Traveling -> Cleaning -> Scanning ...
//!     |          |
//!     v          v
//!   Done       Stuck
//! ```
//!
//! Every pass through Cleaning removes one waste cell and nothing adds waste, so a run on a
//! connected surface ends in `Done` after at most as many passes as there were dirty cells.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::agent::CleaningAgent;
use crate::error::{CleanerError, CleanerResult};
use crate::event::{CleaningEvent, CleaningObserver, Termination};
use crate::grid::{Position, Surface};
use crate::path_finder::{AStar, Path, PathFinder};

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub termination: Termination,

    /// Total single-cell moves made.
    pub moves: usize,

    /// Cells cleaned, in the order they were cleaned.
    pub cleaned: Vec<Position>,
}

enum Phase {
    Scanning,
    Routing(Vec<Position>),
    Traveling(Path),
    Cleaning,
    Finished(Termination),
}

/// Clean `surface` with A* routing, discarding events.
pub fn run_cleaning<S>(agent: &mut CleaningAgent, surface: &mut S) -> CleanerResult<CleaningReport>
where
    S: Surface + ?Sized,
{
    run_cleaning_with(agent, surface, &AStar, &mut ())
}

/// Clean `surface` until no waste is left (`Done`) or the nearest waste cannot be reached
/// (`Stuck`). Every event is passed to `observer`, ending with `Finished`.
///
/// Errors other than an unreachable target (a path step the agent rejects, an out-of-bounds
/// start) abort the run and are returned as is. The agent and surface are left wherever the
/// error caught them.
pub fn run_cleaning_with<S, P, O>(
    agent: &mut CleaningAgent,
    surface: &mut S,
    path_finder: &P,
    observer: &mut O,
) -> CleanerResult<CleaningReport>
where
    S: Surface + ?Sized,
    P: PathFinder,
    O: CleaningObserver + ?Sized,
{
    if !surface.contains(agent.position()) {
        return Err(CleanerError::OutOfBounds {
            position: agent.position(),
            size: surface.size(),
        });
    }

    let mut moves = 0;
    let mut cleaned = Vec::new();
    let mut phase = Phase::Scanning;
    let termination = loop {
        phase = match phase {
            Phase::Scanning => {
                let dirty = surface.dirty_cells();
                if dirty.is_empty() {
                    Phase::Finished(Termination::Done)
                } else {
                    debug!(dirty = dirty.len(), "scanned");
                    Phase::Routing(dirty)
                }
            }
            Phase::Routing(dirty) => match agent.select_nearest_target(&dirty) {
                None => Phase::Finished(Termination::Done),
                Some(target) => {
                    let distance = agent.position().manhattan_distance(&target);
                    debug!(from = %agent.position(), %target, distance, "routing");
                    observer.observe(&CleaningEvent::Targeted { target, distance });
                    match path_finder.search(agent.position(), target, &*surface) {
                        Ok(path) => Phase::Traveling(path),
                        Err(CleanerError::NotFound { .. }) => {
                            Phase::Finished(Termination::Stuck { target })
                        }
                        Err(e) => return Err(e),
                    }
                }
            },
            Phase::Traveling(path) => {
                moves += agent.follow(&path, &*surface, &mut *observer)?;
                Phase::Cleaning
            }
            Phase::Cleaning => {
                agent.clean_here(&mut *surface, &mut *observer)?;
                cleaned.push(agent.position());
                Phase::Scanning
            }
            Phase::Finished(termination) => break termination,
        };
    };

    match termination {
        Termination::Done => info!(moves, cleaned = cleaned.len(), "all clean"),
        Termination::Stuck { target } => {
            warn!(%target, moves, cleaned = cleaned.len(), "stuck, target unreachable")
        }
    }
    observer.observe(&CleaningEvent::Finished { termination });

    Ok(CleaningReport {
        termination,
        moves,
        cleaned,
    })
}
