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

//! Character displays.
//!
//! A [`Display`] is a fixed grid of characters that is given whole screens of
//! text. Only the redraw thread ever touches it.
//!
//! * [`terminal`]: A simulated LCD drawn with `ratatui`, which only writes
//!   the cells that changed since the previous frame.
//! * [`console`]: Prints each new screen to stderr inside a frame.

mod console;
mod terminal;

pub(crate) use console::ConsoleDisplay;
pub(crate) use terminal::{TerminalDisplay, restore_terminal, setup_terminal};

use anyhow::Result;

pub(crate) trait Display: Send {
    /// Width in characters.
    fn width(&self) -> usize;

    /// Height in rows.
    fn height(&self) -> usize;

    /// Shows `lines`, one per row from the top.
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;
}

/// A display that remembers every screen written to it.
#[cfg(test)]
pub(crate) struct RecordingDisplay {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) screens: Vec<Vec<String>>,
}

#[cfg(test)]
impl RecordingDisplay {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            screens: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Display for RecordingDisplay {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        self.screens.push(lines.to_vec());
        Ok(())
    }
}
