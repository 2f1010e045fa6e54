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

//! Visual styling for the simulated LCD.
//!
//! The palette imitates a yellow-green backlit character display with dark
//! segments, set into a grey bezel.

use ratatui::style::{Color, Style};

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) segment_colour: Color,
    pub(crate) bezel_colour: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(150, 190, 40),
            segment_colour: Color::Rgb(20, 40, 10),
            bezel_colour: Color::Rgb(102, 102, 102),
        }
    }

    /// Style for the characters on the display glass.
    pub(crate) fn glass_style(&self) -> Style {
        Style::default()
            .fg(self.segment_colour)
            .bg(self.background_colour)
    }

    pub(crate) fn bezel_style(&self) -> Style {
        Style::default().fg(self.bezel_colour)
    }
}
