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

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::grid::Position;

/// How a cleaning run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Termination {
    /// No waste left anywhere.
    Done,

    /// Waste remains at `target` but no path reaches it.
    Stuck { target: Position },
}

impl Display for Termination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Done => write!(f, "done"),
            Termination::Stuck { target } => write!(f, "stuck, no path to {}", target),
        }
    }
}

/// Something observable that happened during a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CleaningEvent {
    /// The agent picked its next target.
    Targeted { target: Position, distance: usize },

    /// The agent moved one cell.
    Moved { to: Position },

    /// The agent cleaned the cell it stands on.
    Cleaned { at: Position },

    /// The run is over. Always the last event of a run.
    Finished { termination: Termination },
}

impl Display for CleaningEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CleaningEvent::Targeted { target, distance } => {
                write!(f, "targeting {} at distance {}", target, distance)
            }
            CleaningEvent::Moved { to } => write!(f, "moved to {}", to),
            CleaningEvent::Cleaned { at } => write!(f, "cleaned {}", at),
            CleaningEvent::Finished { termination } => write!(f, "{}", termination),
        }
    }
}

/// Receives every event of a cleaning run, in order. This is the hook renderers attach to.
pub trait CleaningObserver {
    fn observe(&mut self, event: &CleaningEvent);
}

/// Discards events.
impl CleaningObserver for () {
    fn observe(&mut self, _event: &CleaningEvent) {}
}

/// Records events.
impl CleaningObserver for Vec<CleaningEvent> {
    fn observe(&mut self, event: &CleaningEvent) {
        self.push(*event);
    }
}

impl<O> CleaningObserver for &mut O
where
    O: CleaningObserver + ?Sized,
{
    fn observe(&mut self, event: &CleaningEvent) {
        (**self).observe(event);
    }
}
