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

use std::io::Write;

use waste_cleaner::{CleaningEvent, CleaningObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    /// One human readable line per event.
    Text,

    /// One JSON object per line.
    Json,
}

/// Writes each cleaning event as it happens. The first write error is kept and returned by
/// `finish`; later events are dropped.
pub struct EventPrinter<W: Write> {
    out: W,
    format: EventFormat,
    error: Option<std::io::Error>,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W, format: EventFormat) -> Self {
        Self {
            out,
            format,
            error: None,
        }
    }

    fn write_event(&mut self, event: &CleaningEvent) -> std::io::Result<()> {
        match self.format {
            EventFormat::Text => writeln!(self.out, "{}", event),
            EventFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)
            }
        }
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> CleaningObserver for EventPrinter<W> {
    fn observe(&mut self, event: &CleaningEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(event) {
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use waste_cleaner::{Position, Termination};

    use super::*;

    fn events() -> Vec<CleaningEvent> {
        vec![
            CleaningEvent::Moved {
                to: Position::new(0, 1),
            },
            CleaningEvent::Cleaned {
                at: Position::new(0, 1),
            },
            CleaningEvent::Finished {
                termination: Termination::Done,
            },
        ]
    }

    #[test]
    fn test_text_format() {
        let mut printer = EventPrinter::new(Vec::new(), EventFormat::Text);
        for event in events() {
            printer.observe(&event);
        }
        let out = printer.finish().expect("finish failed");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "moved to (0, 1)\ncleaned (0, 1)\ndone\n"
        );
    }

    #[test]
    fn test_json_format() {
        let mut printer = EventPrinter::new(Vec::new(), EventFormat::Json);
        for event in events() {
            printer.observe(&event);
        }
        let out = String::from_utf8(printer.finish().expect("finish failed")).expect("utf8");
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).expect("invalid json"))
            .collect();
        assert_eq!(
            lines[0],
            serde_json::json!({"event": "moved", "to": {"x": 0, "y": 1}})
        );
        assert_eq!(
            lines[2],
            serde_json::json!({"event": "finished", "termination": {"state": "done"}})
        );
    }
}
