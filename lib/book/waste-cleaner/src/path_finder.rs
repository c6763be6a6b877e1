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

//! A* shortest-path search over a `Surface`.
//!
//! Every move costs 1 and the heuristic is Manhattan distance. With 4-directional movement the
//! Manhattan distance is exactly the minimum number of moves between two cells, so it is
//! admissible and consistent and the first time the goal is popped its path is optimal.
//!
//! Ties on `f = g + h` are broken by insertion order: of two frontier entries with the same
//! priority, the one pushed first is popped first. Together with the fixed neighbour order of
//! `Surface::neighbors` this makes the returned path fully deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::debug;

use crate::error::{CleanerError, CleanerResult};
use crate::grid::{Position, Surface};
use crate::HashMap;

/// Ordered sequence of positions from a start cell to a goal cell, both included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path(Vec<Position>);

impl Path {
    /// Wrap a list of positions without checking it. `Agent::follow` validates every step.
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self(positions)
    }

    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    pub fn start(&self) -> Option<Position> {
        self.0.first().copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of moves needed to walk the path, one less than the number of positions.
    pub fn moves(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CostEntry {
    cost: usize,
    came_from: Option<Position>,
}

/// Best known cost from the start to each discovered position, plus the predecessor it was
/// reached from.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    entries: HashMap<Position, CostEntry>,
}

impl CostTable {
    fn with_start(start: Position) -> Self {
        let mut entries = HashMap::default();
        entries.insert(
            start,
            CostEntry {
                cost: 0,
                came_from: None,
            },
        );
        Self { entries }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.entries.contains_key(pos)
    }

    pub fn cost_of(&self, pos: &Position) -> Option<usize> {
        self.entries.get(pos).map(|entry| entry.cost)
    }

    pub fn came_from(&self, pos: &Position) -> Option<Position> {
        self.entries.get(pos).and_then(|entry| entry.came_from)
    }

    /// Record `cost` for `pos`, reached from `came_from`, if `pos` is new or `cost` is strictly
    /// lower than what is recorded. Returns whether the table changed.
    pub fn relax(&mut self, pos: Position, cost: usize, came_from: Position) -> bool {
        match self.cost_of(&pos) {
            Some(existing) if existing <= cost => false,
            _ => {
                self.entries.insert(
                    pos,
                    CostEntry {
                        cost,
                        came_from: Some(came_from),
                    },
                );
                true
            }
        }
    }

    fn reconstruct(&self, start: Position, goal: Position) -> CleanerResult<Path> {
        let mut positions = vec![goal];
        let mut current = goal;
        while current != start {
            current = self
                .came_from(&current)
                .ok_or(CleanerError::NotFound { start, goal })?;
            positions.push(current);
        }
        positions.reverse();
        Ok(Path(positions))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    priority: usize,
    sequence: u64,
    cost: usize,
    position: Position,
}

// BinaryHeap is a max-heap, so the comparison is reversed: lowest priority first, then lowest
// sequence number.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_sequence: u64,
}

impl Frontier {
    fn push(&mut self, position: Position, cost: usize, priority: usize) {
        self.heap.push(FrontierEntry {
            priority,
            sequence: self.next_sequence,
            cost,
            position,
        });
        self.next_sequence += 1;
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }
}

/// Finds a route between two cells of a surface.
pub trait PathFinder {
    /// Returns the path from `start` to `goal`, both included, or `NotFound` when the two are not
    /// connected. Never mutates the surface.
    fn search<S>(&self, start: Position, goal: Position, surface: &S) -> CleanerResult<Path>
    where
        S: Surface + ?Sized;
}

/// A* with a Manhattan heuristic and uniform step cost.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AStar;

impl PathFinder for AStar {
    fn search<S>(&self, start: Position, goal: Position, surface: &S) -> CleanerResult<Path>
    where
        S: Surface + ?Sized,
    {
        for pos in [start, goal] {
            if !surface.contains(pos) {
                return Err(CleanerError::OutOfBounds {
                    position: pos,
                    size: surface.size(),
                });
            }
        }

        let mut frontier = Frontier::default();
        let mut costs = CostTable::with_start(start);
        frontier.push(start, 0, start.manhattan_distance(&goal));

        let mut expanded = 0usize;
        while let Some(entry) = frontier.pop() {
            if entry.position == goal {
                let path = costs.reconstruct(start, goal)?;
                debug!(%start, %goal, moves = path.moves(), expanded, "path found");
                return Ok(path);
            }

            // Already reached more cheaply through another entry.
            if costs
                .cost_of(&entry.position)
                .is_some_and(|best| entry.cost > best)
            {
                continue;
            }

            expanded += 1;
            for next in surface.neighbors(entry.position)? {
                let new_cost = entry.cost + 1;
                if costs.relax(next, new_cost, entry.position) {
                    frontier.push(next, new_cost, new_cost + next.manhattan_distance(&goal));
                }
            }
        }

        debug!(%start, %goal, expanded, "frontier exhausted");
        Err(CleanerError::NotFound { start, goal })
    }
}

/// Shortcut for `AStar.search(start, goal, surface)`.
pub fn search<S>(start: Position, goal: Position, surface: &S) -> CleanerResult<Path>
where
    S: Surface + ?Sized,
{
    AStar.search(start, goal, surface)
}
