// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::io::Write;

use anyhow::{Context, Result};

use crate::display::Display;

/// Prints screens as framed text, skipping repeats of the last one.
pub(crate) struct ConsoleDisplay<W> {
    out: W,
    width: usize,
    height: usize,
    shown: Vec<String>,
}

impl<W: Write + Send> ConsoleDisplay<W> {
    pub(crate) fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width,
            height,
            shown: Vec::new(),
        }
    }
}

impl<W: Write + Send> Display for ConsoleDisplay<W> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        if self.shown == lines {
            return Ok(());
        }

        let edge = format!("+{}+", "-".repeat(self.width));
        let mut screen = format!("{}\n", edge);
        for row in 0..self.height {
            let line = lines.get(row).map(String::as_str).unwrap_or_default();
            screen.push_str(&format!("|{:<width$}|\n", line, width = self.width));
        }
        screen.push_str(&edge);
        screen.push('\n');

        self.out
            .write_all(screen.as_bytes())
            .and_then(|_| self.out.flush())
            .context("Failed to write screen")?;

        self.shown = lines.to_vec();
        Ok(())
    }
}
